pub mod seed_service;
pub mod term_repository;
