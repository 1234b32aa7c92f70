//! Общие контракты backend и frontend: агрегаты, DTO, правила доступа
//! и реестр полей.

pub mod domain;
pub mod shared;
pub mod system;
