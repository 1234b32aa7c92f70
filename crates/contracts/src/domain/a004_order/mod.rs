pub mod aggregate;

pub use aggregate::{Order, OrderDto, OrderEnvelope, OrderId, OrderStatus, OrderStatusPatch};
