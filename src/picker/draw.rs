//! Winner drawing
//!
//! [`draw`] is the pure operation: order the pool, optionally collapse it to
//! one entry per person, then pick `k` entries uniformly without replacement.
//! [`DrawSession`] wraps it in the `Idle -> Drawing -> Complete` flow used by
//! interactive front ends, where a newer draw supersedes an in-flight one and
//! only a completed draw replaces the committed winners.

use chrono::Utc;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Comment, SortMode, Winner};
use crate::picker::sort::sort_comments;

/// Reasons a draw cannot produce winners
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Zero winners requested
    #[error("At least one winner must be requested")]
    NoWinnersRequested,

    /// No eligible comments at all
    #[error("No eligible comments to draw from")]
    EmptyPool,

    /// More winners requested than eligible entries
    #[error("Cannot draw {requested} winner(s) from {available} eligible entries")]
    InsufficientPool { requested: usize, available: usize },

    /// The ticket was replaced by a newer draw before it finished
    #[error("Draw {ticket} was superseded by draw {current}")]
    Superseded { ticket: u64, current: u64 },
}

/// Options controlling a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    pub winners: usize,
    pub allow_duplicate_users: bool,
    pub sort_mode: SortMode,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            winners: 1,
            allow_duplicate_users: false,
            sort_mode: SortMode::Random,
        }
    }
}

/// Order candidates and apply the one-entry-per-person policy
///
/// With duplicates disallowed, the first comment per lower-cased username
/// (in sorted order) is kept.
pub fn build_pool<R: Rng + ?Sized>(
    valid_comments: &[Comment],
    allow_duplicate_users: bool,
    sort_mode: SortMode,
    rng: &mut R,
) -> Vec<Comment> {
    let ordered = sort_comments(valid_comments, sort_mode, rng);
    if allow_duplicate_users {
        return ordered;
    }

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .filter(|c| seen.insert(c.user_key()))
        .collect()
}

/// Human-readable provenance recorded on each winner
pub fn selection_method(sort_mode: SortMode, pool_size: usize, allow_duplicate_users: bool) -> String {
    let policy = if allow_duplicate_users {
        "multiple entries per user allowed"
    } else {
        "one entry per user"
    };
    let entries = if pool_size == 1 { "entry" } else { "entries" };
    format!(
        "Uniform random draw from {pool_size} eligible {entries}, candidates ordered {}, {policy}",
        sort_mode.label()
    )
}

/// Draw `k` winners from the valid comments
///
/// Fails without producing anything when `k` is zero or exceeds the
/// (deduplicated) pool.
///
/// # Examples
///
/// ```
/// use giveaway_picker::models::{Comment, CommentSource, SortMode};
/// use giveaway_picker::picker::draw;
/// use rand::SeedableRng;
///
/// let pool: Vec<Comment> = ["ann", "ben", "cat"]
///     .iter()
///     .map(|u| Comment::new(u, "count me in", CommentSource::Manual))
///     .collect();
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
/// let winners = draw(&pool, 2, false, SortMode::Random, &mut rng).unwrap();
/// assert_eq!(winners.len(), 2);
/// assert_eq!(winners[0].position, 1);
/// ```
pub fn draw<R: Rng + ?Sized>(
    valid_comments: &[Comment],
    k: usize,
    allow_duplicate_users: bool,
    sort_mode: SortMode,
    rng: &mut R,
) -> Result<Vec<Winner>, DrawError> {
    if k == 0 {
        return Err(DrawError::NoWinnersRequested);
    }

    let mut pool = build_pool(valid_comments, allow_duplicate_users, sort_mode, rng);
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }
    if k > pool.len() {
        return Err(DrawError::InsufficientPool {
            requested: k,
            available: pool.len(),
        });
    }

    let method = selection_method(sort_mode, pool.len(), allow_duplicate_users);
    let selected_at = Utc::now();
    let mut winners = Vec::with_capacity(k);

    for position in 1..=k {
        let index = rng.gen_range(0..pool.len());
        let picked = pool.swap_remove(index);
        winners.push(Winner::from_comment(&picked, position, &method, selected_at));
    }

    tracing::info!(
        winners = winners.len(),
        pool = winners.len() + pool.len(),
        sort_mode = %sort_mode,
        allow_duplicate_users,
        "Drew winners"
    );
    Ok(winners)
}

// ============================================================================
// Draw session state machine
// ============================================================================

/// Handle for one draw attempt; only the newest ticket can commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTicket {
    generation: u64,
}

impl DrawTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Where the interactive draw flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing { generation: u64 },
    Complete,
}

/// Interactive draw flow holding the committed winners
#[derive(Debug, Clone)]
pub struct DrawSession {
    state: DrawState,
    generation: u64,
    winners: Vec<Winner>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self {
            state: DrawState::Idle,
            generation: 0,
            winners: Vec::new(),
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Committed winners of the last completed draw
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Start a draw, superseding any draw still in progress
    pub fn begin(&mut self) -> DrawTicket {
        self.generation += 1;
        if let DrawState::Drawing { generation } = self.state {
            tracing::debug!(superseded = generation, current = self.generation, "Draw superseded");
        }
        self.state = DrawState::Drawing {
            generation: self.generation,
        };
        DrawTicket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: DrawTicket) -> bool {
        self.state
            == DrawState::Drawing {
                generation: ticket.generation,
            }
    }

    /// Transient candidate shown while drawing; never committed
    pub fn preview<'a, R: Rng + ?Sized>(
        &self,
        ticket: DrawTicket,
        pool: &'a [Comment],
        rng: &mut R,
    ) -> Option<&'a Comment> {
        if !self.is_current(ticket) || pool.is_empty() {
            return None;
        }
        pool.get(rng.gen_range(0..pool.len()))
    }

    /// Finish a draw
    ///
    /// A successful result from the current ticket replaces the committed
    /// winners. A failed result or a stale ticket leaves them untouched.
    pub fn finish(
        &mut self,
        ticket: DrawTicket,
        result: Result<Vec<Winner>, DrawError>,
    ) -> Result<&[Winner], DrawError> {
        if !self.is_current(ticket) {
            return Err(DrawError::Superseded {
                ticket: ticket.generation,
                current: self.generation,
            });
        }

        match result {
            Ok(winners) => {
                self.winners = winners;
                self.state = DrawState::Complete;
                Ok(self.winners.as_slice())
            }
            Err(e) => {
                self.state = if self.winners.is_empty() {
                    DrawState::Idle
                } else {
                    DrawState::Complete
                };
                Err(e)
            }
        }
    }

    /// Run a complete draw in one step
    pub fn draw_now<R: Rng + ?Sized>(
        &mut self,
        valid_comments: &[Comment],
        options: DrawOptions,
        rng: &mut R,
    ) -> Result<&[Winner], DrawError> {
        let ticket = self.begin();
        let result = draw(
            valid_comments,
            options.winners,
            options.allow_duplicate_users,
            options.sort_mode,
            rng,
        );
        self.finish(ticket, result)
    }
}

impl Default for DrawSession {
    fn default() -> Self {
        Self::new()
    }
}
