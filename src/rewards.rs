//! Reward calculation. A lookup, not arithmetic: amounts are authored per
//! activity in the catalog so content owners control the balance.

use serde::{Deserialize, Serialize};

use crate::catalog::ActivityDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub xp: u32,
    pub tokens: u32,
}

impl Reward {
    pub const ZERO: Reward = Reward { xp: 0, tokens: 0 };

    pub fn is_zero(&self) -> bool {
        self.xp == 0 && self.tokens == 0
    }
}

/// An unqualified completion is still recorded and journaled, but mints
/// nothing.
pub fn reward_for(activity: &ActivityDefinition, qualifies: bool) -> Reward {
    if !qualifies {
        return Reward::ZERO;
    }
    Reward {
        xp: activity.reward_xp,
        tokens: activity.reward_tokens,
    }
}
