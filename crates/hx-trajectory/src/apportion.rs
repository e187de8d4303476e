//! Spread a traveled leg's duration over the links of its matched route.
//!
//! With `D = end - start` and `T` the summed link length, link `i` with
//! cumulative length `d` before it is given
//!
//! ```text
//! entry = start + round(D · d / T)
//! exit  = start + round(D · (d + len_i) / T)
//! ```
//!
//! Each boundary is computed once and shared by the link before and after
//! it, so the events are contiguous and the last exit is exactly `end`.

use hx_spatial::{Network, Route};

use crate::model::Event;

/// Link events for a leg over `[start, end)` along `route`.
///
/// Returns an empty list when `end <= start` or the route has no length.
pub fn apportion(start: i64, end: i64, route: &Route, network: &Network) -> Vec<Event> {
    let duration = end - start;
    let total: f64 = route.links.iter().map(|&l| network.link(l).length_m).sum();
    if duration <= 0 || !(total > 0.0) {
        return Vec::new();
    }

    let d = duration as f64;
    let boundary = |covered: f64| -> i64 { start + (d * covered / total).round() as i64 };

    let mut events = Vec::with_capacity(route.links.len());
    let mut covered = 0.0;
    let mut entry = start;
    for (i, &link) in route.links.iter().enumerate() {
        covered += network.link(link).length_m;
        let exit = if i + 1 == route.links.len() { end } else { boundary(covered).min(end) };
        events.push(Event::new(link, entry, exit));
        entry = exit;
    }
    events
}
