/// Quality score every item starts from before any comparison is applied.
/// Also the score reported for items that have never been compared.
pub const INITIAL_QUALITY_SCORE: f64 = 0.5;

/// Win ratio assumed for an item with no recorded comparisons.
pub const NEUTRAL_WIN_RATIO: f64 = 0.5;

/// Step size of the rating update (K in the ELO formula).
pub const LEARNING_RATE: f64 = 0.05;

/// Score difference at which the expected win probability moves by a factor of 10.
///
/// Quality scores live in [0, 1], so a scale of 0.1 makes the expectation
/// saturate after a few tenths of separation.
pub const SCORE_SCALE: f64 = 0.1;

/// Lower and upper bound of a quality score. Applied after every single update.
pub const MIN_QUALITY_SCORE: f64 = 0.0;
pub const MAX_QUALITY_SCORE: f64 = 1.0;

/// The random draw for the next pair is taken from the best 1/N of scored candidates.
///
/// Drawing from a pool instead of always taking the top candidate keeps the
/// session from offering the same pair again whenever the top score is tied,
/// and adds a little exploration.
pub const CANDIDATE_POOL_DIVISOR: usize = 5;
