#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send the start request for a validated run.
    LaunchJob { request: crate::RunRequest },
    /// Halt local polling and ask the server to stop the job.
    StopJob { job_id: crate::JobId },
    /// The backend answered 401; hand over to the login flow.
    RequireLogin,
}
