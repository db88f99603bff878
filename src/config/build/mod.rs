mod learners;

pub use learners::build_learner;
