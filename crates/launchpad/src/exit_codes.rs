//! Exit codes for the CLI

use launchpad_core::error::{LaunchpadError, WorkflowError};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// Exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> i32 {
    let Some(err) = err.downcast_ref::<LaunchpadError>() else {
        return ERROR;
    };

    match err.stage_cause() {
        LaunchpadError::Workflow(WorkflowError::Cancelled) => CANCELLED,
        LaunchpadError::Config(_) => CONFIG_ERROR,
        LaunchpadError::Git(_) => GIT_ERROR,
        LaunchpadError::Version(_) => VERSION_ERROR,
        LaunchpadError::Manifest(_) | LaunchpadError::Workflow(WorkflowError::GuardFailed { .. }) => {
            VALIDATION_ERROR
        }
        _ => ERROR,
    }
}
