/// Line requested by a client before pricing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemDraft {
    pub producto_id: Option<String>,
    pub descripcion: Option<String>,
    pub cantidad: i64,
    /// Centavos; taken from the product when omitted
    pub precio_unitario: Option<i64>,
}

/// Line with a resolved description, unit price and amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    pub producto_id: Option<String>,
    pub descripcion: String,
    pub cantidad: i64,
    pub precio_unitario: i64,
    pub importe: i64,
}

/// Priced lines of an order plus their total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub monto: i64,
}
