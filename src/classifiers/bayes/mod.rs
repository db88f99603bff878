mod class_gaussians;
mod gaussian_naive_bayes;

pub use class_gaussians::ClassGaussians;
pub use gaussian_naive_bayes::GaussianNaiveBayes;
