use core::fmt;

/// Structural invariants the world must satisfy between ticks. Violations
/// are programming errors in the simulation, not recoverable conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantCode {
    GapHeightRange,
    GapSpanExact,
    PipePieceGeometry,
    PipeOrdering,
    BirdFixedX,
    BirdTiltRange,
    AgentLiveFlag,
    FitnessLedgerLength,
    BaseSegmentSpacing,
}

impl fmt::Display for InvariantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GapHeightRange => write!(f, "GAP_HEIGHT_RANGE"),
            Self::GapSpanExact => write!(f, "GAP_SPAN_EXACT"),
            Self::PipePieceGeometry => write!(f, "PIPE_PIECE_GEOMETRY"),
            Self::PipeOrdering => write!(f, "PIPE_ORDERING"),
            Self::BirdFixedX => write!(f, "BIRD_FIXED_X"),
            Self::BirdTiltRange => write!(f, "BIRD_TILT_RANGE"),
            Self::AgentLiveFlag => write!(f, "AGENT_LIVE_FLAG"),
            Self::FitnessLedgerLength => write!(f, "FITNESS_LEDGER_LENGTH"),
            Self::BaseSegmentSpacing => write!(f, "BASE_SEGMENT_SPACING"),
        }
    }
}

impl std::error::Error for InvariantCode {}
