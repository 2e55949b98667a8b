use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::base::{base_entity, ActivationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    #[sea_orm(string_value = "mobile_money")]
    MobileMoney,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "paypal")]
    Paypal,
}

/// Settlement state of a payment.
///
/// A pending payment either succeeds or fails; only a successful payment
/// can be refunded. `failed` and `refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl PaymentStatus {
    pub fn can_transition_to(self, target: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Success) | (Pending, Failed) | (Success, Refunded)
        )
    }
}

/// A payment for a rental or a purchase.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub is_deleted: bool,
    pub activation_status: ActivationStatus,
    pub activate_date: Option<DateTimeUtc>,
    pub deactivate_date: Option<DateTimeUtc>,
    pub created: DateTimeUtc,
    pub modified: DateTimeUtc,
    pub metadata: Json,
    pub user_id: Uuid,
    /// Absent for purchases and other payments not tied to a rental.
    pub booking_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// Reference issued by the payment provider.
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::rental_booking::Entity",
        from = "Column::BookingId",
        to = "super::rental_booking::Column::Id",
        on_delete = "Cascade"
    )]
    RentalBooking,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::rental_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalBooking.def()
    }
}

base_entity!();
