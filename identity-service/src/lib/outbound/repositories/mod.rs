pub mod company;
pub mod principal;
pub mod role_entity;

pub use company::PostgresCompanyRepository;
pub use principal::PostgresPrincipalRepository;
pub use role_entity::PostgresRoleEntityRepository;
