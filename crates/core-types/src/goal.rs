use crate::error::CoreError;
use crate::structs::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A goal as submitted by its owner, before storage assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
}

impl NewGoal {
    /// Rejects blank names and non-positive targets.
    pub fn new(name: impl Into<String>, target_amount: Decimal) -> Result<Self, CoreError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "name".to_string(),
                "goal name must not be empty".to_string(),
            ));
        }
        if target_amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "target_amount".to_string(),
                format!("target must be positive, got {target_amount}"),
            ));
        }
        Ok(Self {
            name,
            target_amount,
        })
    }

    /// The stored goal, with nothing saved yet.
    pub fn into_goal(self, id: i64, owner: UserId, created_at: DateTime<Utc>) -> Goal {
        Goal::new(id, owner, self.name, self.target_amount, created_at)
    }
}

/// A savings target. Money is added over time until `current_amount` reaches
/// `target_amount`, at which point the goal can be redeemed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub owner: UserId,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        id: i64,
        owner: UserId,
        name: impl Into<String>,
        target_amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            target_amount,
            current_amount: Decimal::ZERO,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_achieved(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Adds `amount` to the saved total.
    pub fn add_savings(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), CoreError> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "amount".to_string(),
                format!("savings must be positive, got {amount}"),
            ));
        }
        self.current_amount += amount;
        self.updated_at = at;
        Ok(())
    }

    /// Checks that the goal may be redeemed. The caller removes it from storage.
    pub fn redeem(&self) -> Result<(), CoreError> {
        if self.is_achieved() {
            Ok(())
        } else {
            Err(CoreError::GoalNotAchieved(self.name.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn goal() -> Goal {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Goal::new(1, UserId(7), "Bike", dec!(300), at)
    }

    #[test]
    fn savings_accumulate_until_target() {
        let mut g = goal();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        g.add_savings(dec!(100), later).unwrap();
        assert!(!g.is_achieved());
        assert_eq!(g.redeem(), Err(CoreError::GoalNotAchieved("Bike".to_string())));

        g.add_savings(dec!(200), later).unwrap();
        assert_eq!(g.current_amount, dec!(300));
        assert_eq!(g.updated_at, later);
        assert!(g.is_achieved());
        assert!(g.redeem().is_ok());
    }

    #[test]
    fn new_goal_is_validated() {
        let draft = NewGoal::new("  Bike ", dec!(300)).unwrap();
        assert_eq!(draft.name, "Bike");
        assert!(NewGoal::new("   ", dec!(300)).is_err());
        assert!(NewGoal::new("Bike", dec!(0)).is_err());

        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(draft.into_goal(1, UserId(7), at), goal());
    }

    #[test]
    fn non_positive_savings_are_rejected() {
        let mut g = goal();
        assert!(g.add_savings(dec!(0), g.created_at).is_err());
        assert!(g.add_savings(dec!(-5), g.created_at).is_err());
        assert_eq!(g.current_amount, Decimal::ZERO);
    }
}
