//! E2E test harness for ctxgit.

pub mod workspace;

pub use workspace::TestWorkspace;
