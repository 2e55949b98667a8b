use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Starts a `CREATE TABLE` with the bookkeeping columns every table carries.
fn base_table<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(uuid(Base::Id).primary_key())
        .col(boolean(Base::IsDeleted).default(false))
        .col(string_len(Base::ActivationStatus, 10).default("active"))
        .col(timestamp_with_time_zone_null(Base::ActivateDate))
        .col(timestamp_with_time_zone_null(Base::DeactivateDate))
        .col(timestamp_with_time_zone(Base::Created))
        .col(timestamp_with_time_zone(Base::Modified))
        .col(json(Base::Metadata))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                base_table(Users::Table)
                    .col(string_len(Users::Email, 254).unique_key())
                    .col(string_len_null(Users::PhoneNumber, 32).unique_key())
                    .col(string_len(Users::FirstName, 255))
                    .col(string_len(Users::LastName, 255))
                    .col(text_null(Users::Address))
                    .col(string_null(Users::ProfilePhoto))
                    .col(boolean(Users::IsActive).default(false))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .col(boolean(Users::HasAcceptedTerms).default(false))
                    .to_owned(),
            )
            .await?;

        // Create car_brands table
        manager
            .create_table(
                base_table(CarBrands::Table)
                    .col(string_len(CarBrands::Name, 100).unique_key())
                    .col(string_null(CarBrands::Logo))
                    .to_owned(),
            )
            .await?;

        // Create car_categories table
        manager
            .create_table(
                base_table(CarCategories::Table)
                    .col(string_len(CarCategories::Name, 100).unique_key())
                    .col(text_null(CarCategories::Description))
                    .to_owned(),
            )
            .await?;

        // Create cars table
        manager
            .create_table(
                base_table(Cars::Table)
                    .col(uuid(Cars::BrandId))
                    .col(uuid_null(Cars::CategoryId))
                    .col(string_len(Cars::Name, 150))
                    .col(integer(Cars::ModelYear))
                    .col(string_len(Cars::LicensePlate, 20).unique_key())
                    .col(string_len(Cars::Color, 50))
                    .col(integer(Cars::Seats).default(4))
                    .col(string_len(Cars::Transmission, 20).default("automatic"))
                    .col(string_len(Cars::FuelType, 20).default("petrol"))
                    .col(decimal(Cars::DailyRate).decimal_len(10, 2))
                    .col(decimal_null(Cars::SalePrice).decimal_len(12, 2))
                    .col(text_null(Cars::Description))
                    .col(uuid_null(Cars::OwnerId))
                    .col(string_len(Cars::Status, 20).default("available"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_brand")
                            .from(Cars::Table, Cars::BrandId)
                            .to(CarBrands::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_category")
                            .from(Cars::Table, Cars::CategoryId)
                            .to(CarCategories::Table, Base::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_owner")
                            .from(Cars::Table, Cars::OwnerId)
                            .to(Users::Table, Base::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create car_images table
        manager
            .create_table(
                base_table(CarImages::Table)
                    .col(uuid(CarImages::CarId))
                    .col(string(CarImages::Image))
                    .col(boolean(CarImages::IsFeatured).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_images_car")
                            .from(CarImages::Table, CarImages::CarId)
                            .to(Cars::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rental_bookings table
        manager
            .create_table(
                base_table(RentalBookings::Table)
                    .col(uuid(RentalBookings::UserId))
                    .col(uuid(RentalBookings::CarId))
                    .col(date(RentalBookings::StartDate))
                    .col(date(RentalBookings::EndDate))
                    .col(decimal(RentalBookings::TotalPrice).decimal_len(10, 2))
                    .col(string_len(RentalBookings::Status, 20).default("pending"))
                    .col(string_len_null(RentalBookings::PickupLocation, 255))
                    .col(string_len_null(RentalBookings::DropoffLocation, 255))
                    .col(text_null(RentalBookings::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_bookings_user")
                            .from(RentalBookings::Table, RentalBookings::UserId)
                            .to(Users::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_bookings_car")
                            .from(RentalBookings::Table, RentalBookings::CarId)
                            .to(Cars::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                base_table(Payments::Table)
                    .col(uuid(Payments::UserId))
                    .col(uuid_null(Payments::BookingId))
                    .col(decimal(Payments::Amount).decimal_len(10, 2))
                    .col(string_len(Payments::Method, 20))
                    .col(string_len(Payments::TransactionId, 100).unique_key())
                    .col(string_len(Payments::Status, 20).default("pending"))
                    .col(timestamp_with_time_zone_null(Payments::PaidAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_user")
                            .from(Payments::Table, Payments::UserId)
                            .to(Users::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_booking")
                            .from(Payments::Table, Payments::BookingId)
                            .to(RentalBookings::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create car_reviews table
        manager
            .create_table(
                base_table(CarReviews::Table)
                    .col(uuid(CarReviews::UserId))
                    .col(uuid(CarReviews::CarId))
                    .col(integer(CarReviews::Rating))
                    .col(text_null(CarReviews::Comment))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_reviews_user")
                            .from(CarReviews::Table, CarReviews::UserId)
                            .to(Users::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_reviews_car")
                            .from(CarReviews::Table, CarReviews::CarId)
                            .to(Cars::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per (user, car)
        manager
            .create_index(
                Index::create()
                    .name("idx_car_reviews_user_car")
                    .table(CarReviews::Table)
                    .col(CarReviews::UserId)
                    .col(CarReviews::CarId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_status")
                    .table(Cars::Table)
                    .col(Cars::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(CarReviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RentalBookings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CarImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CarCategories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CarBrands::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Base {
    Id,
    IsDeleted,
    ActivationStatus,
    ActivateDate,
    DeactivateDate,
    Created,
    Modified,
    Metadata,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Email,
    PhoneNumber,
    FirstName,
    LastName,
    Address,
    ProfilePhoto,
    IsActive,
    IsStaff,
    IsSuperuser,
    HasAcceptedTerms,
}

#[derive(DeriveIden)]
enum CarBrands {
    Table,
    Name,
    Logo,
}

#[derive(DeriveIden)]
enum CarCategories {
    Table,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    BrandId,
    CategoryId,
    Name,
    ModelYear,
    LicensePlate,
    Color,
    Seats,
    Transmission,
    FuelType,
    DailyRate,
    SalePrice,
    Description,
    OwnerId,
    Status,
}

#[derive(DeriveIden)]
enum CarImages {
    Table,
    CarId,
    Image,
    IsFeatured,
}

#[derive(DeriveIden)]
enum RentalBookings {
    Table,
    UserId,
    CarId,
    StartDate,
    EndDate,
    TotalPrice,
    Status,
    PickupLocation,
    DropoffLocation,
    Notes,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    UserId,
    BookingId,
    Amount,
    Method,
    TransactionId,
    Status,
    PaidAt,
}

#[derive(DeriveIden)]
enum CarReviews {
    Table,
    UserId,
    CarId,
    Rating,
    Comment,
}
