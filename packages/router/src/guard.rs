use std::{future::Future, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};

use crate::{navigation::NavigationContext, GuardError, Redirect};

/// What a guard resolves to: `Ok(None)` to proceed, `Ok(Some(_))` to redirect.
pub type GuardResult<R> = Result<Option<Redirect<R>>, GuardError>;

/// A type-erased guard, as stored in the [`RouteTable`](crate::RouteTable).
pub type Guard<R> =
    Arc<dyn Fn(NavigationContext<R>) -> BoxFuture<'static, GuardResult<R>> + Send + Sync>;

/// The verdict of a single guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome<R> {
    /// Enter the requested route.
    Proceed,
    /// Enter another route instead.
    RedirectTo(Redirect<R>),
}

pub(crate) fn erase<R, F, Fut>(guard: F) -> Guard<R>
where
    F: Fn(NavigationContext<R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardResult<R>> + Send + 'static,
{
    Arc::new(move |cx| guard(cx).boxed())
}

/// Run `guard` (if any) to completion.
///
/// Without a guard the outcome is [`GuardOutcome::Proceed`] right away.
pub async fn run_guard<R>(
    guard: Option<Guard<R>>,
    cx: NavigationContext<R>,
) -> Result<GuardOutcome<R>, GuardError> {
    let Some(guard) = guard else {
        return Ok(GuardOutcome::Proceed);
    };

    Ok(match guard(cx).await? {
        Some(redirect) => GuardOutcome::RedirectTo(redirect),
        None => GuardOutcome::Proceed,
    })
}
