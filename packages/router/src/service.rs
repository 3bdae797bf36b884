use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures_channel::{
    mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
    oneshot,
};
use futures_util::StreamExt;
use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};
use wayfinder_history::{HistoryStore, LocationEntry, NativeHistory, Params};

use crate::{
    guard::{run_guard, GuardOutcome},
    navigation::{NavigationContext, NavigationKind},
    Location, NavigationError, RouteKind, RouteTable, RouterConfig, RoutingCallback,
};

type Reply<R> = oneshot::Sender<Result<Location<R>, NavigationError<R>>>;

/// A set of messages that the [`RouterService`] can handle.
pub(crate) enum RouterMessage<R: RouteKind> {
    /// Navigate to a route, pushing a new history entry.
    Dispatch {
        route: R,
        params: Params,
        reply: Reply<R>,
    },

    /// The native history travelled to `index`.
    ///
    /// Pops announced by the [`NativeHistory`] itself have nobody waiting for them.
    Pop {
        index: usize,
        reply: Option<Reply<R>>,
    },

    /// Answer once every earlier message has been handled.
    Idle(oneshot::Sender<()>),

    /// Stop the service.
    Shutdown,
}

/// A navigation that got through all guards and is ready to be committed.
struct Verdict<R> {
    entry: LocationEntry<R>,
    redirected: bool,
}

/// The core of the router.
///
/// Combines the [`RouteTable`] and the [`HistoryStore`]. Navigation requests are sent to it by
/// [`Router`] handles and by the [`NativeHistory`] (on back/forward) through a channel, and are
/// handled strictly one after another by [`RouterService::run`]. Guards are the only point where
/// the service waits, so a pending guard holds back every request queued behind it.
pub struct RouterService<R: RouteKind> {
    /// Indices the native history will announce because the service sent it there, oldest first.
    echoes: VecDeque<usize>,
    history: HistoryStore<R>,
    max_redirects: usize,
    on_update: Option<RoutingCallback<R>>,
    rx: UnboundedReceiver<RouterMessage<R>>,
    state: Arc<RwLock<Location<R>>>,
    table: RouteTable<R>,
}

impl<R: RouteKind> RouterService<R> {
    /// Create a new [`RouterService`] and a [`Router`] handle linked to it.
    ///
    /// Subscribes to the pop events of `native`. Fails if the initial route can't be resolved.
    pub fn new(
        table: RouteTable<R>,
        config: RouterConfig<R>,
        native: impl NativeHistory + 'static,
    ) -> Result<(Self, Router<R>), NavigationError<R>> {
        let RouterConfig {
            initial,
            initial_params,
            max_redirects,
            on_update,
        } = config;

        let (tx, rx) = unbounded();

        let initial = table.resolve(&initial, initial_params)?;
        debug!(route = ?initial.route, url = %initial.url, "starting router");
        let mut history = HistoryStore::new(initial, native);

        let pops = tx.clone();
        history.subscribe(Arc::new(move |index| {
            pops.unbounded_send(RouterMessage::Pop { index, reply: None })
                .ok();
        }));

        let state = Arc::new(RwLock::new(Location::capture(&history)));

        Ok((
            Self {
                echoes: VecDeque::new(),
                history,
                max_redirects,
                on_update,
                rx,
                state: state.clone(),
                table,
            },
            Router { tx, state },
        ))
    }

    /// The routers event loop.
    ///
    /// Runs until [`Router::shutdown`] is called. The pop subscription holds a sender of its own,
    /// so dropping every [`Router`] is not enough. On the way out, the service unsubscribes from
    /// the native history. Requests that are still queued fail with [`NavigationError::Shutdown`].
    pub async fn run(mut self) {
        while let Some(message) = self.rx.next().await {
            match message {
                RouterMessage::Dispatch {
                    route,
                    params,
                    reply,
                } => {
                    let result = self.dispatch(route, params).await;
                    reply.send(result).ok();
                }
                RouterMessage::Pop { index, reply } => {
                    let result = self.pop(index).await;
                    match reply {
                        Some(reply) => {
                            reply.send(result).ok();
                        }
                        None => {
                            if let Err(err) = result {
                                error!(index, "navigation through native history failed: {err}");
                            }
                        }
                    }
                }
                RouterMessage::Idle(reply) => {
                    reply.send(()).ok();
                }
                RouterMessage::Shutdown => break,
            }
        }

        debug!("stopping router");
        self.history.unsubscribe();
        self.rx.close();
    }

    async fn dispatch(
        &mut self,
        route: R,
        params: Params,
    ) -> Result<Location<R>, NavigationError<R>> {
        let next = self.table.resolve(&route, params)?;
        let prev = self.history.current().clone();

        let verdict = evaluate(
            &self.table,
            self.max_redirects,
            prev,
            next,
            NavigationKind::Dispatch,
        )
        .await?;

        self.history.push(verdict.entry);
        Ok(self.publish())
    }

    async fn pop(&mut self, index: usize) -> Result<Location<R>, NavigationError<R>> {
        if self.echoes.front() == Some(&index) {
            self.echoes.pop_front();
            trace!(index, "native history caught up");
            return Ok(self.state.read().clone());
        }

        let len = self.history.len();
        let Some(next) = self.history.get(index).cloned() else {
            warn!(index, len, "pop outside of the history");
            return Err(NavigationError::InvalidIndex { index, len });
        };

        if index == self.history.index() {
            trace!(index, "pop to the current entry");
            return Ok(self.state.read().clone());
        }

        let prev = self.history.current().clone();
        let verdict = evaluate(
            &self.table,
            self.max_redirects,
            prev,
            next,
            NavigationKind::Pop,
        )
        .await;

        match verdict {
            Ok(Verdict {
                redirected: false, ..
            }) => self.history.move_to(index),
            Ok(Verdict {
                entry,
                redirected: true,
            }) => {
                let before = index.checked_sub(1);
                match before.filter(|before| self.history.entries()[*before].route == entry.route) {
                    // the redirect points back to the entry before the popped one: go there
                    // instead of duplicating it
                    Some(before) => {
                        debug!(
                            index,
                            before,
                            route = ?entry.route,
                            "pop redirected to the previous entry"
                        );
                        self.history.move_to(before);
                        self.realign_native(index);
                    }
                    None => {
                        debug!(index, route = ?entry.route, "pop redirected, replacing entry");
                        self.history.move_to(index);
                        self.history.replace(entry);
                    }
                }
            }
            Err(err) => {
                // the native history already moved, take it back to the committed entry
                self.realign_native(index);
                return Err(err);
            }
        }

        Ok(self.publish())
    }

    /// Send the native history from `native_index` back to the committed index.
    ///
    /// The native history announces the travel like any other pop. Requests queued in the
    /// meantime may have moved on by the time it arrives, so it is recognized by order rather
    /// than by comparing it to the current index.
    fn realign_native(&mut self, native_index: usize) {
        if self.history.realign_native(native_index) {
            self.echoes.push_back(self.history.index());
        }
    }

    /// Make the current history state visible to [`Router::location`] and the update callback.
    fn publish(&self) -> Location<R> {
        let location = Location::capture(&self.history);
        debug!(
            route = ?location.route,
            index = location.index,
            url = %location.url(),
            "navigation committed"
        );

        *self.state.write() = location.clone();
        if let Some(on_update) = &self.on_update {
            on_update(&location);
        }

        location
    }
}

/// Run the guards for `next`, following redirects until a guard lets the navigation proceed.
async fn evaluate<R: RouteKind>(
    table: &RouteTable<R>,
    max_redirects: usize,
    prev: LocationEntry<R>,
    mut next: LocationEntry<R>,
    kind: NavigationKind,
) -> Result<Verdict<R>, NavigationError<R>> {
    let mut chain = Vec::new();

    loop {
        let guard = table.get(&next.route)?.guard_fn();
        trace!(route = ?next.route, ?kind, guarded = guard.is_some(), "evaluating guard");

        let cx = NavigationContext {
            prev_route: prev.clone(),
            next_route: next.clone(),
            kind,
            redirects: chain.len(),
        };

        let outcome = run_guard(guard, cx).await.map_err(|source| {
            warn!(route = ?next.route, "guard failed: {source}");
            NavigationError::Guard {
                route: next.route.clone(),
                source,
            }
        })?;

        let redirect = match outcome {
            GuardOutcome::Proceed => {
                return Ok(Verdict {
                    redirected: !chain.is_empty(),
                    entry: next,
                })
            }
            GuardOutcome::RedirectTo(redirect) => redirect,
        };

        debug!(from = ?next.route, to = ?redirect.route, "guard redirected");
        chain.push(next.route);
        if chain.len() > max_redirects {
            error!(limit = max_redirects, ?chain, "redirect loop");
            return Err(NavigationError::RedirectLoop {
                limit: max_redirects,
                chain,
            });
        }

        next = table.resolve(&redirect.route, redirect.params)?;
    }
}

/// A handle to a [`RouterService`].
///
/// Handles are cheap to clone. Every request is queued the moment the method is called, so
/// requests are handled in call order, no matter when (or whether) the returned futures are
/// polled.
pub struct Router<R: RouteKind> {
    tx: UnboundedSender<RouterMessage<R>>,
    state: Arc<RwLock<Location<R>>>,
}

impl<R: RouteKind> Clone for Router<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            state: self.state.clone(),
        }
    }
}

impl<R: RouteKind> Router<R> {
    /// Navigate to `route`, pushing a new history entry once its guards let it through.
    pub fn dispatch(&self, route: R) -> Navigation<R> {
        self.dispatch_with(route, Params::new())
    }

    /// Navigate to `route`, resolved with `params`.
    pub fn dispatch_with(&self, route: R, params: Params) -> Navigation<R> {
        let (reply, rx) = oneshot::channel();
        self.send(
            RouterMessage::Dispatch {
                route,
                params,
                reply,
            },
            rx,
        )
    }

    /// Handle a travel of the native history to `index`.
    ///
    /// Meant for native history integrations that report pops themselves, rather than through a
    /// [`PopCallback`](wayfinder_history::PopCallback). The native history is expected to already
    /// be at `index`. Travels the router starts on its own to realign the native history are
    /// expected to be reported here as well.
    pub fn pop(&self, index: usize) -> Navigation<R> {
        let (reply, rx) = oneshot::channel();
        self.send(
            RouterMessage::Pop {
                index,
                reply: Some(reply),
            },
            rx,
        )
    }

    /// Resolves once every request queued before this call has been handled.
    pub fn idle(&self) -> impl Future<Output = ()> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let queued = self.tx.unbounded_send(RouterMessage::Idle(reply)).is_ok();

        async move {
            if queued {
                rx.await.ok();
            }
        }
    }

    /// The committed routing state.
    ///
    /// Never reflects a navigation whose guards are still running.
    #[must_use]
    pub fn location(&self) -> Location<R> {
        self.state.read().clone()
    }

    /// Ask the [`RouterService`] to stop once the requests queued so far are handled.
    pub fn shutdown(&self) {
        self.tx.unbounded_send(RouterMessage::Shutdown).ok();
    }

    fn send(
        &self,
        message: RouterMessage<R>,
        rx: oneshot::Receiver<Result<Location<R>, NavigationError<R>>>,
    ) -> Navigation<R> {
        match self.tx.unbounded_send(message) {
            Ok(()) => Navigation { rx: Some(rx) },
            Err(_) => {
                debug!("navigation requested after shutdown");
                Navigation { rx: None }
            }
        }
    }
}

/// The outcome of a queued navigation request.
///
/// Resolves with the committed [`Location`] or the reason the navigation failed. Dropping it
/// doesn't cancel the navigation.
#[derive(Debug)]
pub struct Navigation<R: RouteKind> {
    rx: Option<oneshot::Receiver<Result<Location<R>, NavigationError<R>>>>,
}

impl<R: RouteKind> Future for Navigation<R> {
    type Output = Result<Location<R>, NavigationError<R>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(Err(NavigationError::Shutdown));
        };

        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(NavigationError::Shutdown)),
            Poll::Pending => Poll::Pending,
        }
    }
}
