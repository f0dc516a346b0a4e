//! Courier Tasks
//!
//! Workflow tasks built on the Courier clients:
//! - [`segment::SyncTask`]: trigger a Segment Reverse ETL sync, optionally
//!   waiting for it through [`poll::poll_until_terminal`]
//! - [`segment::StatusTask`]: read the status of a sync
//! - [`sendgrid::MailSendTask`]: send an email with attachments
//! - [`twilio::NotifyTask`]: push a Twilio Notify notification
//!
//! All tasks implement [`Task`] and stop when their [`CancellationToken`] fires.
//!
//! # Example
//!
//! ```no_run
//! use courier_tasks::config::SegmentConfig;
//! use courier_tasks::segment::{SyncParams, SyncTask};
//! use courier_tasks::{CancellationToken, Task};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> courier_tasks::Result<()> {
//!     let config = SegmentConfig::new("segment-token");
//!     config.validate()?;
//!
//!     let task = SyncTask::new(
//!         Arc::new(config.client(reqwest::Client::new())),
//!         SyncParams {
//!             source_id: "warehouse".to_string(),
//!             model_id: "model".to_string(),
//!             subscription_id: "subscription".to_string(),
//!             wait: true,
//!             poll: config.poll,
//!         },
//!     );
//!
//!     let output = task.run(CancellationToken::new()).await?;
//!     println!("{}", output.sync_id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod poll;
pub mod segment;
pub mod sendgrid;
pub mod task;
pub mod twilio;

pub use error::{Result, TaskError};
pub use task::Task;
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
pub(crate) mod testing {
    use axum::Router;

    /// Serves `app` on an ephemeral local port and returns its base URL
    pub async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
