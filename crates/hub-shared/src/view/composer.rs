//! Post composer: the login form and the post form, gated by the session.
//!
//! ```text
//! Hidden -> LoginForm -> (login ok) -> PostForm -> Submitting -> PostForm
//! ```
//!
//! `Hidden` lasts until the auth backend has confirmed the initial session,
//! so a signed-in user never sees the login form flash up.
//!
//! A submission can be driven in two steps when the write should outlive
//! the composer: take the request with [`Composer::begin_submit`], spawn
//! `PostWriter::create` on it, and hand the result to
//! [`Composer::complete_submit`] only if the composer still exists, or
//! give the form back with [`Composer::cancel_submit`].
//!
//! Every method leaves the composer usable when its future is dropped
//! part-way, e.g. under a timeout.

use hub_core::PostError;
use hub_core::domain::{Identity, PostDraft, PostId, Session};
use hub_core::services::{PostWriter, SessionProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerMode {
    Hidden,
    LoginForm,
    PostForm,
    Submitting,
}

/// Inline message under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug)]
pub struct Composer {
    mode: ComposerMode,
    identity: Option<Identity>,
    notice: Option<Notice>,
    /// Post form fields.
    pub draft: PostDraft,
    /// Login form fields.
    pub email: String,
    pub password: String,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            mode: ComposerMode::Hidden,
            identity: None,
            notice: None,
            draft: PostDraft::default(),
            email: String::new(),
            password: String::new(),
        }
    }

    pub fn mode(&self) -> ComposerMode {
        self.mode
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn signed_in_as(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.email.as_str())
    }

    /// A submission is waiting for the store.
    pub fn is_submitting(&self) -> bool {
        self.mode == ComposerMode::Submitting
    }

    /// Follow a session snapshot from the session provider.
    pub fn on_session(&mut self, session: &Session) {
        self.identity = session.identity().cloned();
        if self.mode == ComposerMode::Submitting {
            // Settled by complete_submit.
            return;
        }
        self.mode = self.settled_mode();
    }

    /// Submit the login form. Returns whether the user is now signed in.
    pub async fn login(&mut self, sessions: &SessionProvider) -> bool {
        if self.mode != ComposerMode::LoginForm {
            return false;
        }
        self.notice = None;

        match sessions.login(self.email.trim(), &self.password).await {
            Ok(session) => {
                self.password.clear();
                self.on_session(&session);
                self.notice = Some(Notice::Success("Signed in".to_string()));
                true
            }
            Err(e) => {
                self.notice = Some(Notice::Error(format!("Sign-in failed: {e}")));
                false
            }
        }
    }

    /// Sign out. The draft is kept either way.
    pub async fn logout(&mut self, sessions: &SessionProvider) -> bool {
        if self.mode != ComposerMode::PostForm {
            return false;
        }
        self.notice = None;

        match sessions.logout().await {
            Ok(()) => {
                self.on_session(&Session::signed_out());
                true
            }
            Err(e) => {
                self.notice = Some(Notice::Error(format!("Sign-out failed: {e}")));
                false
            }
        }
    }

    /// Take the draft for submission and enter `Submitting`.
    ///
    /// `None` unless the post form is showing for a signed-in user.
    pub fn begin_submit(&mut self) -> Option<(PostDraft, Identity)> {
        if self.mode != ComposerMode::PostForm {
            tracing::debug!(mode = ?self.mode, "Submit ignored");
            return None;
        }
        let identity = self.identity.clone()?;

        self.mode = ComposerMode::Submitting;
        self.notice = None;
        Some((self.draft.clone(), identity))
    }

    /// Apply the outcome of a submission started with `begin_submit`.
    ///
    /// Success clears the form; failure keeps every field as typed.
    pub fn complete_submit(&mut self, result: Result<PostId, PostError>) {
        if self.mode != ComposerMode::Submitting {
            return;
        }
        self.mode = self.settled_mode();

        match result {
            Ok(id) => {
                tracing::debug!(post_id = %id, "Composer cleared after publish");
                self.draft = PostDraft::default();
                self.notice = Some(Notice::Success("Post published".to_string()));
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    /// Leave `Submitting` without an outcome. The draft is kept as typed.
    pub fn cancel_submit(&mut self) {
        if self.mode == ComposerMode::Submitting {
            tracing::debug!("Submission abandoned");
            self.mode = self.settled_mode();
        }
    }

    /// Submit the post form and wait for the store's answer.
    ///
    /// If the returned future is dropped before the store answers, the
    /// form comes back with the draft intact.
    pub async fn submit(&mut self, writer: &PostWriter) -> Option<PostId> {
        let (draft, author) = self.begin_submit()?;
        let guard = SubmitGuard(self);
        let result = writer.create(&draft, &author).await;
        let id = result.as_ref().ok().cloned();
        guard.0.complete_submit(result);
        id
    }

    fn settled_mode(&self) -> ComposerMode {
        if self.identity.is_some() {
            ComposerMode::PostForm
        } else {
            ComposerMode::LoginForm
        }
    }
}

/// Hands the form back if a `submit` future is dropped mid-write.
struct SubmitGuard<'a>(&'a mut Composer);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.cancel_submit();
    }
}
