//! Tokio driver for a [`FeedSession`].
//!
//! Commands, fetch completions and timer expiries all arrive on one mpsc
//! channel and are applied in order by a single task, so the session never
//! sees two events at once. Fetches run as their own tasks and report back
//! through the same channel. The loop ends once every [`FeedHandle`] has been
//! dropped.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use stashtv_contracts::source::{SceneSource, SourceError};
use stashtv_contracts::visibility::VisibilitySource;
use stashtv_model::RawScene;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{FeedError, Result};
use crate::events::{FeedNotice, NoticeBus};
use crate::loader::FetchRequest;
use crate::session::{FeedCommand, FeedSession, SessionOutput, SessionSnapshot};

#[derive(Debug)]
enum RuntimeMessage<H> {
    Command(FeedCommand<H>),
    Fetched {
        request_id: u64,
        result: std::result::Result<Vec<RawScene>, SourceError>,
    },
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// Cloneable handle into a running feed.
#[derive(Debug)]
pub struct FeedHandle<H> {
    tx: mpsc::UnboundedSender<RuntimeMessage<H>>,
    bus: NoticeBus,
}

impl<H> Clone for FeedHandle<H> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<H> FeedHandle<H> {
    pub fn send(&self, command: FeedCommand<H>) -> Result<()> {
        self.tx
            .send(RuntimeMessage::Command(command))
            .map_err(|_| FeedError::Closed)
    }

    pub fn report_visibility(&self, index: usize, ratio: f32) -> Result<()> {
        self.send(FeedCommand::Visibility { index, ratio })
    }

    pub fn tap(&self, index: usize) -> Result<()> {
        self.send(FeedCommand::Tap { index })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedNotice> {
        self.bus.subscribe()
    }

    /// Current session state, taken after every earlier command was applied.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RuntimeMessage::Snapshot(reply))
            .map_err(|_| FeedError::Closed)?;
        rx.await.map_err(|_| FeedError::Closed)
    }
}

/// A session bound to its scene provider, not yet running.
pub struct FeedRuntime<S: VisibilitySource> {
    session: FeedSession<S>,
    source: Arc<dyn SceneSource>,
    bus: NoticeBus,
}

impl<S> fmt::Debug for FeedRuntime<S>
where
    S: VisibilitySource + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedRuntime")
            .field("session", &self.session)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl<S> FeedRuntime<S>
where
    S: VisibilitySource + Send + 'static,
    S::Handle: Send + 'static,
{
    pub fn new(session: FeedSession<S>, source: Arc<dyn SceneSource>) -> Self {
        let bus = NoticeBus::new(session.tuning().notice_capacity);
        Self {
            session,
            source,
            bus,
        }
    }

    /// Subscribe before [`FeedRuntime::spawn`] to see the first page land.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedNotice> {
        self.bus.subscribe()
    }

    /// Start the session loop and request the first page.
    pub fn spawn(self) -> (FeedHandle<S::Handle>, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let weak = tx.downgrade();
        let handle = FeedHandle {
            tx,
            bus: self.bus.clone(),
        };

        let Self {
            mut session,
            source,
            bus,
        } = self;
        let driver = Driver {
            tx: weak,
            source,
            bus,
            tap_ttl: session.tuning().tap_feedback(),
        };

        let join = tokio::spawn(async move {
            if let Some(request) = session.start() {
                driver.fetch(request);
            }

            while let Some(message) = rx.recv().await {
                let output = match message {
                    RuntimeMessage::Command(command) => {
                        session.handle(command, Instant::now())
                    }
                    RuntimeMessage::Fetched { request_id, result } => {
                        session.complete_fetch(request_id, result)
                    }
                    RuntimeMessage::Snapshot(reply) => {
                        let _ = reply.send(session.snapshot());
                        continue;
                    }
                };
                driver.dispatch(output);
            }

            session.shutdown();
            tracing::debug!("feed runtime stopped");
        });

        (handle, join)
    }
}

/// Side effects of a [`SessionOutput`]. Background tasks only hold a weak
/// sender so they never keep a dropped feed alive.
struct Driver<H> {
    tx: mpsc::WeakUnboundedSender<RuntimeMessage<H>>,
    source: Arc<dyn SceneSource>,
    bus: NoticeBus,
    tap_ttl: Duration,
}

impl<H: Send + 'static> Driver<H> {
    fn dispatch(&self, output: SessionOutput) {
        if let Some(request) = output.fetch {
            self.fetch(request);
        }
        for notice in output.notices {
            if let FeedNotice::TapFeedbackShown(feedback) = &notice {
                self.expire_later(feedback.id);
            }
            self.bus.publish(notice);
        }
    }

    fn fetch(&self, request: FetchRequest) {
        let tx = self.tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source.fetch_batch(request.offset, request.count).await;
            let Some(tx) = tx.upgrade() else {
                tracing::trace!(
                    request = request.id,
                    "feed gone before fetch completed"
                );
                return;
            };
            let _ = tx.send(RuntimeMessage::Fetched {
                request_id: request.id,
                result,
            });
        });
    }

    fn expire_later(&self, id: u64) {
        let tx = self.tx.clone();
        let ttl = self.tap_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(RuntimeMessage::Command(
                    FeedCommand::ExpireTapFeedback { id },
                ));
            }
        });
    }
}
