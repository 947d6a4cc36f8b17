//! Moving the listing to its next page.
//!
//! The pager has no reliable id, so the next control is picked by label, then by
//! glyph, then by position. A click only counts once the "Showing" counter moves.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::parse::{element_text, find_indicator};
use crate::view::{Control, PageView};
use crate::{PaginationState, Timing};

#[allow(clippy::expect_used)]
static CONTROLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a, button").expect("control selector is valid"));

const NEXT_GLYPHS: [&str; 4] = ["›", "❯", "→", ">"];

/// Outcome of one attempt to move to the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved {
        from: PaginationState,
        to: PaginationState,
    },
    Stopped(Stop),
}

impl Advance {
    pub fn is_moved(&self) -> bool {
        matches!(self, Advance::Moved { .. })
    }
}

/// Why the listing did not move. None of these are errors, they all end collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// No readable "Showing" counter to compare against.
    UnknownState,
    /// The counter has no container holding any controls.
    NoPager,
    /// The chosen control is disabled.
    Disabled,
    /// Clicking failed or timed out.
    ClickFailed,
    /// The counter did not change within the polling budget.
    NoProgress,
}

/// Tries to move the view to the next page, returns `true` only if it moved.
pub async fn advance<V: PageView>(view: &mut V, timing: &Timing) -> bool {
    next_page(view, timing).await.is_moved()
}

/// Like [`advance`], but tells why the listing did not move.
pub async fn next_page<V: PageView>(view: &mut V, timing: &Timing) -> Advance {
    let (before, next) = {
        let Some(doc) = read_document(view).await else {
            return Advance::Stopped(Stop::UnknownState);
        };
        let before = PaginationState::read(&doc);
        if !before.is_known() {
            return Advance::Stopped(Stop::UnknownState);
        }
        (before, pick_next(&doc))
    };

    let control = match next {
        Ok(control) => control,
        Err(stop) => {
            debug!(?before, ?stop, "no usable next control");
            return Advance::Stopped(stop);
        }
    };
    debug!(path = %control.path, label = %control.label, "found next control");

    match timeout(timing.click, view.scroll_into_view(&control)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => debug!(%err, "scrolling to next control failed, clicking anyway"),
        Err(_) => debug!("scrolling to next control timed out, clicking anyway"),
    }

    match timeout(timing.click, view.click(&control)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(%err, path = %control.path, "clicking next control failed");
            return Advance::Stopped(Stop::ClickFailed);
        }
        Err(_) => {
            warn!(path = %control.path, "clicking next control timed out");
            return Advance::Stopped(Stop::ClickFailed);
        }
    }

    // Reads may block while the next page loads, all attempts share the poll budget.
    let poll = async {
        for _ in 0..timing.poll_attempts {
            let after = read_state(view).await;
            if after.is_known() && after.start != before.start {
                return Some(after);
            }
            sleep(timing.poll_interval).await;
        }
        None
    };
    if let Ok(Some(after)) = timeout(timing.poll_budget(), poll).await {
        info!(?before, ?after, "moved to next page");
        return Advance::Moved { from: before, to: after };
    }

    warn!(?before, budget = ?timing.poll_budget(), "listing did not move after click");
    Advance::Stopped(Stop::NoProgress)
}

/// Current pagination state, the zero state if the view can't be read.
pub async fn read_state<V: PageView>(view: &mut V) -> PaginationState {
    read_document(view)
        .await
        .map(|doc| PaginationState::read(&doc))
        .unwrap_or_default()
}

async fn read_document<V: PageView>(view: &mut V) -> Option<Html> {
    match view.content().await {
        Ok(html) => Some(Html::parse_document(&html)),
        Err(err) => {
            debug!(%err, "couldn't read the rendered page");
            None
        }
    }
}

/// Selects the next control near the "Showing" counter and rejects it if disabled.
pub(crate) fn pick_next(doc: &Html) -> Result<Control, Stop> {
    let region = find_indicator(doc)
        .and_then(|indicator| pager_region(&indicator))
        .ok_or(Stop::NoPager)?;

    let controls: Vec<ElementRef> = region.select(&CONTROLS).collect();
    let next = controls
        .iter()
        .rev()
        .find(|c| has_next_label(c))
        .or_else(|| controls.iter().rev().find(|c| has_next_glyph(c)))
        .or_else(|| controls.last())
        .ok_or(Stop::NoPager)?;

    if is_disabled(next) {
        return Err(Stop::Disabled);
    }
    Ok(Control::from_element(next))
}

/// Nearest `div`/`nav` ancestor of the counter that holds at least one control.
fn pager_region<'a>(indicator: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    indicator
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "div" | "nav"))
        .find(|el| el.select(&CONTROLS).next().is_some())
}

fn has_next_label(control: &ElementRef) -> bool {
    control
        .value()
        .attr("aria-label")
        .is_some_and(|label| label.trim().eq_ignore_ascii_case("next"))
}

fn has_next_glyph(control: &ElementRef) -> bool {
    NEXT_GLYPHS.contains(&element_text(control).as_str())
}

fn is_disabled(control: &ElementRef) -> bool {
    let el = control.value();
    let aria = el
        .attr("aria-disabled")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let parent = control
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|p| p.value().attr("class"))
        .is_some_and(|class| class.to_lowercase().contains("disabled"));
    aria || el.attr("disabled").is_some() || parent
}
