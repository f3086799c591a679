use std::sync::Arc;

use shared::{
    domain::{Comment, CommentId, FormField, FormMode},
    protocol::{CreateCommentRequest, ReplaceCommentRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

pub mod error;
pub mod reconcile;
pub mod transport;

pub use error::{RemoteOperation, RemoteOperationFailed, SessionError};
pub use transport::{CommentService, HttpCommentService, DEFAULT_REQUEST_TIMEOUT};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Reject blank form fields before issuing a create or replace.
    pub validate_before_submit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CollectionReplaced { count: usize },
    CommentAppended { comment: Comment },
    CommentsReplaced { id: CommentId, count: usize },
    CommentsRemoved { id: CommentId, count: usize },
    FormChanged { form: Comment },
    OperationFailed { operation: RemoteOperation, message: String },
}

#[derive(Default, Debug, Clone)]
struct SessionState {
    comments: Vec<Comment>,
    form: Comment,
}

/// Local view of the remote comment collection plus the form buffer used to
/// stage creates and replaces.
///
/// The state lock is only taken around reads and reconciliation, never across
/// a remote call, so concurrently issued operations apply their effects in the
/// order their responses arrive.
pub struct CommentSession {
    service: Arc<dyn CommentService>,
    options: SessionOptions,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl CommentSession {
    pub fn new(service: Arc<dyn CommentService>) -> Self {
        Self::with_options(service, SessionOptions::default())
    }

    pub fn with_options(service: Arc<dyn CommentService>, options: SessionOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            options,
            inner: Mutex::new(SessionState::default()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.inner.lock().await.comments.clone()
    }

    pub async fn find_comment(&self, id: CommentId) -> Option<Comment> {
        let guard = self.inner.lock().await;
        guard.comments.iter().find(|entry| entry.id == id).cloned()
    }

    pub async fn form(&self) -> Comment {
        self.inner.lock().await.form.clone()
    }

    pub async fn form_mode(&self) -> FormMode {
        FormMode::of(&self.inner.lock().await.form)
    }

    /// Fetches the remote list and installs its first `limit` records.
    /// On failure the previous collection stays in place.
    pub async fn initialize(&self, limit: usize) -> Result<usize, SessionError> {
        let fetched = self
            .service
            .list_comments()
            .await
            .map_err(|e| self.fail(RemoteOperation::List, e))?;
        let received = fetched.len();
        let count = {
            let mut guard = self.inner.lock().await;
            reconcile::install_initial(&mut guard.comments, fetched, limit)
        };
        info!(limit, received, count, "comments: initial page installed");
        self.emit(SessionEvent::CollectionReplaced { count });
        Ok(count)
    }

    /// Creates `draft` remotely and appends the server's copy. The draft's
    /// identifier is not sent.
    pub async fn create(&self, draft: Comment) -> Result<Comment, SessionError> {
        let request = CreateCommentRequest::from(&draft);
        let created = self
            .service
            .create_comment(&request)
            .await
            .map_err(|e| self.fail(RemoteOperation::Create, e))?;
        if created.is_new() {
            return Err(self.fail(
                RemoteOperation::Create,
                anyhow::anyhow!("server returned a record without an assigned id"),
            ));
        }
        {
            let mut guard = self.inner.lock().await;
            reconcile::append_created(&mut guard.comments, created.clone());
        }
        info!(comment_id = created.id.0, "comments: created");
        self.emit(SessionEvent::CommentAppended {
            comment: created.clone(),
        });
        Ok(created)
    }

    /// Replaces comment `id` remotely, then swaps matching local entries for
    /// the server's copy. An id missing locally still issues the request.
    pub async fn replace(&self, id: CommentId, draft: Comment) -> Result<Comment, SessionError> {
        let request = ReplaceCommentRequest::new(id, &draft);
        let replaced = self
            .service
            .replace_comment(&request)
            .await
            .map_err(|e| self.fail(RemoteOperation::Replace, e))?;
        if replaced.is_new() {
            return Err(self.fail(
                RemoteOperation::Replace,
                anyhow::anyhow!("server returned comment {id} without an id"),
            ));
        }
        let count = {
            let mut guard = self.inner.lock().await;
            reconcile::replace_matching(&mut guard.comments, id, &replaced)
        };
        if count == 0 {
            debug!(comment_id = id.0, "comments: replaced remotely, no local entry");
        } else {
            info!(comment_id = id.0, count, "comments: replaced");
        }
        self.emit(SessionEvent::CommentsReplaced { id, count });
        Ok(replaced)
    }

    pub async fn delete(&self, id: CommentId) -> Result<usize, SessionError> {
        self.service
            .delete_comment(id)
            .await
            .map_err(|e| self.fail(RemoteOperation::Delete, e))?;
        let count = {
            let mut guard = self.inner.lock().await;
            reconcile::remove_matching(&mut guard.comments, id)
        };
        info!(comment_id = id.0, count, "comments: deleted");
        self.emit(SessionEvent::CommentsRemoved { id, count });
        Ok(count)
    }

    pub async fn begin_edit(&self, record: &Comment) {
        self.replace_form(record.clone()).await;
    }

    pub async fn edit_form<F>(&self, edit: F)
    where
        F: FnOnce(&mut Comment),
    {
        let form = {
            let mut guard = self.inner.lock().await;
            edit(&mut guard.form);
            guard.form.clone()
        };
        self.emit(SessionEvent::FormChanged { form });
    }

    pub async fn set_form_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.edit_form(|form| form.set_field(field, value)).await;
    }

    pub async fn clear_form(&self) {
        self.replace_form(Comment::default()).await;
    }

    /// Sends the form buffer as a create (sentinel id) or a replace.
    ///
    /// The buffer is reset before the request is issued, so it is empty again
    /// whether or not the remote call succeeds. A form rejected by validation
    /// is left as it was and nothing is sent.
    pub async fn submit(&self) -> Result<Comment, SessionError> {
        let draft = {
            let mut guard = self.inner.lock().await;
            if self.options.validate_before_submit {
                if let Err(err) = guard.form.validate() {
                    warn!(%err, "comments: form rejected");
                    return Err(err.into());
                }
            }
            std::mem::take(&mut guard.form)
        };
        self.emit(SessionEvent::FormChanged {
            form: Comment::default(),
        });

        match FormMode::of(&draft) {
            FormMode::Create => self.create(draft).await,
            FormMode::Update(id) => self.replace(id, draft).await,
        }
    }

    async fn replace_form(&self, form: Comment) {
        {
            let mut guard = self.inner.lock().await;
            guard.form = form.clone();
        }
        self.emit(SessionEvent::FormChanged { form });
    }

    fn fail(&self, operation: RemoteOperation, source: anyhow::Error) -> SessionError {
        let failure = RemoteOperationFailed { operation, source };
        error!(operation = %operation, "comments: {failure}");
        self.emit(SessionEvent::OperationFailed {
            operation,
            message: failure.to_string(),
        });
        failure.into()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/mock_server.rs"]
mod mock_server;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
