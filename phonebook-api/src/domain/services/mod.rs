mod contacts;

pub use contacts::ContactServiceImpl;
