use crate::classifiers::{Classifier, FitError};
use crate::core::dataset::{Dataset, sorted_categories};
use crate::preprocessing::{FittedTransform, TransformSpec};
use std::collections::HashMap;

/// Column transform followed by a classifier, fitted as one unit.
///
/// The transform is refitted on every call to [`ModelPipeline::fit`], so
/// scaler and encoder statistics only ever come from the training rows.
pub struct ModelPipeline {
    spec: TransformSpec,
    transform: Option<FittedTransform>,
    classifier: Box<dyn Classifier + Send>,
    classes: Vec<String>,
}

impl ModelPipeline {
    pub fn new(spec: TransformSpec, classifier: Box<dyn Classifier + Send>) -> Self {
        Self {
            spec,
            transform: None,
            classifier,
            classes: Vec::new(),
        }
    }

    /// Label names in class-index order, empty before fitting.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn fit(&mut self, data: &Dataset, labels: &[String]) -> Result<(), FitError> {
        if data.n_rows() != labels.len() {
            return Err(FitError::ShapeMismatch {
                features: data.n_rows(),
                labels: labels.len(),
            });
        }
        if labels.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        let transform = self
            .spec
            .fit(data)
            .map_err(|e| FitError::Preprocessing(e.to_string()))?;
        let features = transform
            .transform(data)
            .map_err(|e| FitError::Preprocessing(e.to_string()))?;

        let classes = sorted_categories(labels.iter());
        let index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let y: Vec<usize> = labels.iter().map(|l| index[l.as_str()]).collect();

        self.classifier.fit(&features, &y, classes.len())?;
        self.transform = Some(transform);
        self.classes = classes;
        Ok(())
    }

    /// Non-fatal remarks from the last fit, such as stopping before convergence.
    pub fn fit_warnings(&self) -> Vec<String> {
        self.classifier.fit_warnings()
    }

    pub fn predict(&self, data: &Dataset) -> Result<Vec<String>, FitError> {
        let transform = self.transform.as_ref().ok_or(FitError::NotFitted)?;
        let features = transform
            .transform(data)
            .map_err(|e| FitError::Preprocessing(e.to_string()))?;
        Ok(self
            .classifier
            .predict(&features)
            .into_iter()
            .map(|c| self.classes[c].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::baseline::MajorityClass;
    use crate::classifiers::linear::LogisticRegression;
    use crate::core::dataset::Value;

    fn data(xs: &[f64]) -> Dataset {
        Dataset::from_rows(&["x"], xs.iter().map(|&x| vec![Value::Number(x)]).collect()).unwrap()
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn predicts_label_names() {
        let spec = TransformSpec::new(vec!["x".into()], vec![]);
        let lr = LogisticRegression::new(300, 0.5, 1.0, 1e-6).unwrap();
        let mut p = ModelPipeline::new(spec, Box::new(lr));
        p.fit(
            &data(&[-3.0, -2.0, -1.0, 1.0, 2.0, 3.0]),
            &labels(&["lo", "lo", "lo", "hi", "hi", "hi"]),
        )
        .unwrap();
        assert_eq!(p.classes(), &["hi", "lo"]);
        assert_eq!(p.predict(&data(&[-5.0, 5.0])).unwrap(), labels(&["lo", "hi"]));
    }

    #[test]
    fn classifier_warnings_are_exposed() {
        let spec = TransformSpec::new(vec!["x".into()], vec![]);
        let lr = LogisticRegression::new(1, 0.1, 1.0, 0.0).unwrap();
        let mut p = ModelPipeline::new(spec, Box::new(lr));
        p.fit(&data(&[-1.0, 1.0]), &labels(&["a", "b"])).unwrap();
        assert_eq!(p.fit_warnings().len(), 1);
    }

    #[test]
    fn unfitted_pipeline_refuses_to_predict() {
        let p = ModelPipeline::new(TransformSpec::default(), Box::new(MajorityClass::new()));
        assert_eq!(p.predict(&data(&[1.0])), Err(FitError::NotFitted));
    }

    #[test]
    fn preprocessing_failures_are_fit_errors() {
        let spec = TransformSpec::new(vec!["x".into()], vec![]);
        let mut p = ModelPipeline::new(spec, Box::new(MajorityClass::new()));
        let bad = Dataset::from_rows(&["x"], vec![vec![Value::from("text")]]).unwrap();
        assert!(matches!(
            p.fit(&bad, &labels(&["a"])),
            Err(FitError::Preprocessing(_))
        ));
    }
}
