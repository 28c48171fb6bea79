pub mod error;
pub mod issue;
pub mod spec;

pub use error::{InputError, InputErrorCode, PromptSpecError, Result, ResultExt};
pub use issue::{Issue, Patch, PatchOp, Severity};
pub use spec::{
    Domain, InputKind, InputRef, Intent, Metrics, OutputContract, OutputFormat, SPEC_VERSION,
    SpecContext, SpecIo, Specification,
};
