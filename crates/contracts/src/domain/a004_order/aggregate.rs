use crate::domain::a002_company::aggregate::CompanyId;
use crate::domain::a003_product::aggregate::ProductId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор заказа
    OrderId
);

/// Статус заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::New,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::New => "Новый",
            Self::Processing => "В работе",
            Self::Completed => "Выполнен",
            Self::Cancelled => "Отменён",
        }
    }

    /// Открыт ли заказ (не в конечном статусе)
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Processing)
    }

    /// Допустимые переходы: из конечных статусов выйти нельзя
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (a, b) if *a == b => true,
            (Self::New, Self::Processing | Self::Cancelled | Self::Completed) => true,
            (Self::Processing, Self::Completed | Self::Cancelled) => true,
            _ => false,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Заказ посетителя в компанию
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub base: BaseAggregate<OrderId>,

    #[serde(rename = "companyId")]
    pub company_id: CompanyId,
    #[serde(rename = "productId")]
    pub product_id: Option<ProductId>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub quantity: u32,
    pub message: String,
    pub status: OrderStatus,
}

impl Order {
    /// Создать новый заказ из DTO
    pub fn new_for_insert(dto: &OrderDto) -> Result<Self, String> {
        let company_id = CompanyId::from_string(&dto.company_id)
            .map_err(|_| "Некорректный идентификатор компании".to_string())?;
        let product_id = match dto.product_id.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                ProductId::from_string(raw)
                    .map_err(|_| "Некорректный идентификатор товара".to_string())?,
            ),
            None => None,
        };

        let id = OrderId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]);
        let customer_name = dto.customer_name.trim().to_string();
        let order = Self {
            base: BaseAggregate::new(id, code, format!("Заказ: {}", customer_name)),
            company_id,
            product_id,
            customer_name,
            phone: dto.phone.trim().to_string(),
            email: dto.email.clone().filter(|e| !e.trim().is_empty()),
            quantity: dto.quantity.unwrap_or(1),
            message: dto.message.clone(),
            status: OrderStatus::New,
        };
        order.validate()?;
        Ok(order)
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.is_empty() {
            return Err("Укажите имя".into());
        }
        if self.phone.is_empty() && self.email.is_none() {
            return Err("Укажите телефон или email".into());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err("Некорректный email".into());
            }
        }
        if self.quantity == 0 {
            return Err("Количество должно быть больше нуля".into());
        }
        Ok(())
    }

    /// Сменить статус с проверкой перехода
    pub fn change_status(&mut self, next: OrderStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Нельзя перевести заказ из статуса «{}» в «{}»",
                self.status.display_name(),
                next.display_name()
            ));
        }
        self.status = next;
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "order"
    }

    fn element_name() -> &'static str {
        "Заказ"
    }

    fn list_name() -> &'static str {
        "Заказы"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO нового заказа
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderDto {
    #[serde(rename = "companyId")]
    pub company_id: String,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub message: String,
}

/// Тело запроса `{ "order": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
    pub order: OrderDto,
}

/// Смена статуса заказа
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusPatch {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> OrderDto {
        OrderDto {
            company_id: CompanyId::new_v4().as_string(),
            customer_name: "Анна".into(),
            phone: "+7 900 000-00-00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_order_defaults() {
        let order = Order::new_for_insert(&dto()).unwrap();
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.quantity, 1);
        assert!(order.base.code.starts_with("ORD-"));
    }

    #[test]
    fn test_contact_required() {
        let mut d = dto();
        d.phone = " ".into();
        assert!(Order::new_for_insert(&d).is_err());
        d.email = Some("anna@example.ru".into());
        assert!(Order::new_for_insert(&d).is_ok());
    }

    #[test]
    fn test_bad_company_id() {
        let mut d = dto();
        d.company_id = "not-a-uuid".into();
        assert!(Order::new_for_insert(&d).is_err());
    }

    #[test]
    fn test_status_transitions() {
        let mut order = Order::new_for_insert(&dto()).unwrap();
        assert!(order.change_status(OrderStatus::Processing).is_ok());
        assert!(order.change_status(OrderStatus::Completed).is_ok());
        assert!(!order.status.is_open());
        assert!(order.change_status(OrderStatus::New).is_err());
        assert_eq!(order.status, OrderStatus::Completed);
    }
}
