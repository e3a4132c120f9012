use alloy::primitives::{Address, TxHash, U256};
use log::info;
use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::models::{ForwardRequestError, ForwardRequestSignature, MinedTransaction};

/// Milestones of a forward request submission, in the only order they can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum SubmissionStage {
    Init,
    NonceFetched,
    GasEstimated,
    StructureBuilt,
    Signed,
    SelfVerified,
    Submitted,
    Confirmed,
}

impl SubmissionStage {
    pub fn next(self) -> Option<Self> {
        use SubmissionStage::*;
        match self {
            Init => Some(NonceFetched),
            NonceFetched => Some(GasEstimated),
            GasEstimated => Some(StructureBuilt),
            StructureBuilt => Some(Signed),
            Signed => Some(SelfVerified),
            SelfVerified => Some(Submitted),
            Submitted => Some(Confirmed),
            Confirmed => None,
        }
    }
}

/// Terminal `Failed` state: the error and the last stage reached before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Forward request failed after {stage}: {error}")]
pub struct SubmissionFailure {
    pub stage: SubmissionStage,
    pub error: ForwardRequestError,
}

/// Tracks the current stage of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionProgress {
    stage: SubmissionStage,
}

impl Default for SubmissionProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionProgress {
    pub fn new() -> Self {
        Self {
            stage: SubmissionStage::Init,
        }
    }

    pub fn stage(&self) -> SubmissionStage {
        self.stage
    }

    /// Moves to the following stage and returns it. Stays put once confirmed.
    pub fn advance(&mut self) -> SubmissionStage {
        if let Some(next) = self.stage.next() {
            info!("Forward request: {} -> {}", self.stage, next);
            self.stage = next;
        }
        self.stage
    }

    pub fn fail(&self, error: impl Into<ForwardRequestError>) -> SubmissionFailure {
        SubmissionFailure {
            stage: self.stage,
            error: error.into(),
        }
    }
}

/// Outcome of a submission that reached `Confirmed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedSubmission {
    pub from: Address,
    pub chain_id: u64,
    pub nonce: U256,
    pub gas: u64,
    pub signature: ForwardRequestSignature,
    pub tx_hash: TxHash,
    pub mined: MinedTransaction,
}
