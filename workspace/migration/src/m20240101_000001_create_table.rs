use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 50).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 3).default("ENT"))
                    .to_owned(),
            )
            .await?;

        // Create persons table
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(pk_auto(Persons::Id))
                    .col(string_len(Persons::Name, 128))
                    .col(string_len(Persons::LastName, 128))
                    .col(double(Persons::Height))
                    .col(double(Persons::Weight))
                    .col(double(Persons::Age))
                    .col(double(Persons::Arm))
                    .col(double(Persons::Chest))
                    .col(double(Persons::Waist))
                    .col(double(Persons::Leg))
                    .col(date(Persons::EnrolledOn))
                    .col(boolean(Persons::Training).default(true))
                    .col(string_len_null(Persons::EndReason, 512))
                    .col(date_null(Persons::EndedOn))
                    .col(integer_null(Persons::UserId))
                    .col(integer_null(Persons::TrainerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_persons_user")
                            .from(Persons::Table, Persons::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_persons_trainer")
                            .from(Persons::Table, Persons::TrainerId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create exercises table
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(pk_auto(Exercises::Id))
                    .col(string_len(Exercises::Name, 128))
                    .col(string_len(Exercises::Description, 512))
                    .col(string_len(Exercises::Video, 512))
                    .col(double(Exercises::Calories))
                    .to_owned(),
            )
            .await?;

        // Create routines table
        manager
            .create_table(
                Table::create()
                    .table(Routines::Table)
                    .if_not_exists()
                    .col(pk_auto(Routines::Id))
                    .col(string_len(Routines::Name, 128))
                    .col(string_len(Routines::NameKey, 128).unique_key())
                    .col(string_len(Routines::Description, 512))
                    .to_owned(),
            )
            .await?;

        // Create routines_exercises table (join table)
        manager
            .create_table(
                Table::create()
                    .table(RoutinesExercises::Table)
                    .if_not_exists()
                    .col(integer(RoutinesExercises::RoutineId))
                    .col(integer(RoutinesExercises::ExerciseId))
                    .primary_key(
                        Index::create()
                            .name("pk_routines_exercises")
                            .col(RoutinesExercises::RoutineId)
                            .col(RoutinesExercises::ExerciseId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routines_exercises_routine")
                            .from(RoutinesExercises::Table, RoutinesExercises::RoutineId)
                            .to(Routines::Table, Routines::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routines_exercises_exercise")
                            .from(RoutinesExercises::Table, RoutinesExercises::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trainings table
        manager
            .create_table(
                Table::create()
                    .table(Trainings::Table)
                    .if_not_exists()
                    .col(pk_auto(Trainings::Id))
                    .col(time(Trainings::Duration))
                    .col(integer(Trainings::Repetitions))
                    .col(date(Trainings::Date))
                    .col(integer(Trainings::ExerciseId))
                    .col(integer(Trainings::PersonId))
                    .col(integer_null(Trainings::RoutineId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainings_exercise")
                            .from(Trainings::Table, Trainings::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainings_person")
                            .from(Trainings::Table, Trainings::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainings_routine")
                            .from(Trainings::Table, Trainings::RoutineId)
                            .to(Routines::Table, Routines::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trainings_person_date")
                    .table(Trainings::Table)
                    .col(Trainings::PersonId)
                    .col(Trainings::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Trainings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RoutinesExercises::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Routines::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    Name,
    LastName,
    Height,
    Weight,
    Age,
    Arm,
    Chest,
    Waist,
    Leg,
    EnrolledOn,
    Training,
    EndReason,
    EndedOn,
    UserId,
    TrainerId,
}

#[derive(DeriveIden)]
enum Exercises {
    Table,
    Id,
    Name,
    Description,
    Video,
    Calories,
}

#[derive(DeriveIden)]
enum Routines {
    Table,
    Id,
    Name,
    NameKey,
    Description,
}

#[derive(DeriveIden)]
enum RoutinesExercises {
    Table,
    RoutineId,
    ExerciseId,
}

#[derive(DeriveIden)]
enum Trainings {
    Table,
    Id,
    Duration,
    Repetitions,
    Date,
    ExerciseId,
    PersonId,
    RoutineId,
}
