use thiserror::Error;

/// The single failure signal raised by every adapter and one-shot.
///
/// Output-buffer-full is not represented here: it is the routine signal that
/// more output exists than fits in one round and is absorbed internally by
/// running another round. Everything that does surface is fatal to the
/// adapter instance that raised it. Errors are not retroactive: output
/// already delivered in earlier rounds stays valid, but the failing adapter
/// yields nothing further.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConvError {
    /// The engine could not open the named conversion pair, either because a
    /// name is unsupported or because it could not allocate resources.
    #[error("unable to initialize conversion from {from:?} to {to:?}")]
    Init {
        /// Source encoding name as handed to the engine.
        from: String,
        /// Target encoding name as handed to the engine.
        to: String,
    },

    /// The input contains bytes or code points that do not form a valid unit
    /// under the stated encoding. This includes a source that ends partway
    /// through a multi-byte sequence that can no longer be completed.
    #[error("invalid character sequence for {encoding:?}")]
    InvalidSequence {
        /// The external encoding in effect when the bad unit was hit.
        encoding: String,
    },

    /// Any other engine failure.
    #[error("conversion from {from:?} to {to:?} failed")]
    Failed {
        /// Source encoding name as handed to the engine.
        from: String,
        /// Target encoding name as handed to the engine.
        to: String,
    },
}
