pub mod aws;
pub mod client;
pub mod executor;
pub mod publish;

pub use client::{
    AwsClient, CheckResult, DoctorReport, FunctionError, FunctionManager, FunctionVersion,
    ObjectStorage, StorageError,
};
pub use executor::{AwsExecutor, RealExecutor};
pub use publish::{PublishError, PublishOutcome, publish};
