mod contacts;

pub use contacts::PostgresContactRepository;
