use sea_orm::entity::prelude::*;

/// The role a login account plays in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum Role {
    #[sea_orm(string_value = "ENT")]
    Trainer,
    #[sea_orm(string_value = "CLI")]
    Client,
    #[sea_orm(string_value = "ADM")]
    Admin,
}

impl Role {
    /// Short code used both in the database and in the public API.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Trainer => "ENT",
            Role::Client => "CLI",
            Role::Admin => "ADM",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ENT" => Some(Role::Trainer),
            "CLI" => Some(Role::Client),
            "ADM" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A login credential.
/// The username is unique at the schema level, so concurrent sign-ups
/// with the same name are resolved by the database.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user owns the persons created under its account.
    #[sea_orm(has_many = "super::person::Entity")]
    Person,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
