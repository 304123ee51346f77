//! Voice selection heuristic.
//!
//! A selector given with `--voice` is tried, in order, as a list index, an
//! exact (case-insensitive) name, and a name fragment. Anything else falls
//! back to the first installed voice.

use crate::domain::types::Voice;

/// Which rule picked the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Index,
    ExactName,
    Substring,
    /// Nothing matched (or no selector was given); first voice used
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub voice: &'a Voice,
    pub index: usize,
    pub matched: MatchKind,
}

/// Pick a voice from `voices`. Returns `None` only when the list is empty.
pub fn select_voice<'a>(voices: &'a [Voice], selector: Option<&str>) -> Option<Selection<'a>> {
    let first = voices.first()?;
    let fallback = Selection {
        voice: first,
        index: 0,
        matched: MatchKind::Fallback,
    };

    let selector = match selector.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Some(fallback),
    };

    if let Ok(index) = selector.parse::<usize>() {
        if let Some(voice) = voices.get(index) {
            return Some(Selection {
                voice,
                index,
                matched: MatchKind::Index,
            });
        }
    }

    let exact = voices.iter().position(|v| {
        v.name.eq_ignore_ascii_case(selector) || v.id.eq_ignore_ascii_case(selector)
    });
    if let Some(index) = exact {
        return Some(Selection {
            voice: &voices[index],
            index,
            matched: MatchKind::ExactName,
        });
    }

    let needle = selector.to_lowercase();
    let partial = voices.iter().position(|v| {
        v.name.to_lowercase().contains(&needle) || v.id.to_lowercase().contains(&needle)
    });
    if let Some(index) = partial {
        return Some(Selection {
            voice: &voices[index],
            index,
            matched: MatchKind::Substring,
        });
    }

    Some(fallback)
}
