//! SeaORM entities for the car rental and sales administration.
//!
//! Every table shares the bookkeeping columns described in [`base`].
//! Referential actions on delete are declared on the `belongs_to`
//! relations and created by the migration crate.

pub mod base;
pub mod car;
pub mod car_brand;
pub mod car_category;
pub mod car_image;
pub mod car_review;
pub mod payment;
pub mod rental_booking;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::base::{ActivationStatus, SoftDelete};
    pub use super::car::Entity as Car;
    pub use super::car_brand::Entity as CarBrand;
    pub use super::car_category::Entity as CarCategory;
    pub use super::car_image::Entity as CarImage;
    pub use super::car_review::Entity as CarReview;
    pub use super::payment::Entity as Payment;
    pub use super::rental_booking::Entity as RentalBooking;
    pub use super::user::Entity as User;
}
