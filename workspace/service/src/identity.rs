//! Users: registration, lookup, activation and soft deletion.

use model::entities::prelude::*;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, QueryFilter, Set};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::lifecycle;

const ENTITY: &str = "user";

/// Fields supplied when registering a user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Blank numbers are stored as absent.
    #[validate(length(min = 6, max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub last_name: String,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub has_accepted_terms: bool,
}

/// Trims the address and lowercases its domain part.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Registers a user. New users start inactive.
///
/// Email and phone uniqueness are enforced by the database; a duplicate
/// fails with `Conflict`.
#[instrument(skip(db, new_user), fields(email = %new_user.email))]
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    trace!("Entering create_user function");

    let phone_number = new_user
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string);
    let new_user = NewUser {
        email: normalize_email(&new_user.email),
        phone_number,
        ..new_user
    };
    new_user
        .validate()
        .map_err(|errors| ServiceError::from_validation_errors(ENTITY, &errors))?;

    let unique = [
        ("email", new_user.email.clone()),
        ("phone_number", new_user.phone_number.clone().unwrap_or_default()),
    ];

    let active = user::ActiveModel {
        email: Set(new_user.email),
        phone_number: Set(new_user.phone_number),
        first_name: Set(new_user.first_name.trim().to_string()),
        last_name: Set(new_user.last_name.trim().to_string()),
        address: Set(new_user.address),
        profile_photo: Set(new_user.profile_photo),
        is_active: Set(false),
        is_staff: Set(new_user.is_staff),
        is_superuser: Set(new_user.is_superuser),
        has_accepted_terms: Set(new_user.has_accepted_terms),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    let user = active
        .insert(db)
        .await
        .map_err(|err| ServiceError::from_write(ENTITY, err, &unique))?;

    info!("User created successfully with ID: {}", user.id);
    Ok(user)
}

#[instrument(skip(db))]
pub async fn find_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model> {
    lifecycle::require_live::<User, _>(db, ENTITY, id).await
}

/// Looks a live user up by email, normalised the same way as on creation.
#[instrument(skip(db))]
pub async fn find_user_by_email(db: &DatabaseConnection, email: &str) -> Result<user::Model> {
    let email = normalize_email(email);
    debug!("Fetching user with email: {}", email);

    User::find_live()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found(ENTITY, email))
}

#[instrument(skip(db))]
pub async fn set_user_active(
    db: &DatabaseConnection,
    id: Uuid,
    is_active: bool,
) -> Result<user::Model> {
    let user = find_user(db, id).await?;

    let mut active: user::ActiveModel = user.into();
    active.is_active = Set(is_active);
    let user = active.update(db).await?;

    info!("User {} is_active set to {}", user.id, user.is_active);
    Ok(user)
}

#[instrument(skip(db))]
pub async fn accept_terms(db: &DatabaseConnection, id: Uuid) -> Result<user::Model> {
    let user = find_user(db, id).await?;
    if user.has_accepted_terms {
        return Ok(user);
    }

    let mut active: user::ActiveModel = user.into();
    active.has_accepted_terms = Set(true);
    Ok(active.update(db).await?)
}

/// Hides the user from every live lookup. Bookings, payments and reviews
/// are kept; they only go away with a hard delete at the storage layer.
#[instrument(skip(db))]
pub async fn soft_delete_user(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    lifecycle::soft_delete::<User, _>(db, ENTITY, id).await
}
