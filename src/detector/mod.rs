pub mod recovery;

pub use recovery::recovery_times;
