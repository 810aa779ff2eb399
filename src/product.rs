use crate::error::ValidationError;

/// A product on record. `stock_quantity` is owned by the stock ledger and
/// never written by anything else.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub description: String,
    #[n(3)]
    pub category: String,
    #[n(4)]
    pub price_cents: u64, // Use integers for currency
    #[n(5)]
    pub stock_quantity: u32,
    #[n(6)]
    pub supplier_id: String,
    #[n(7)]
    pub supplier_name: String, // denormalized at creation time
}

// used for constructing drafts before the store is touched
#[derive(Default, Debug)]
pub struct ProductDraft {
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price_cents: u64,
    stock_quantity: u32,
    supplier_id: Option<String>,
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
    pub fn set_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
    pub fn set_price_cents(mut self, price_cents: u64) -> Self {
        self.price_cents = price_cents;
        self
    }
    pub fn set_stock_quantity(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }
    pub fn set_supplier(mut self, supplier_id: &str) -> Self {
        self.supplier_id = Some(supplier_id.to_string());
        self
    }
    pub fn supplier_id(&self) -> Option<&str> {
        self.supplier_id.as_deref()
    }

    /// Checks fields, then shapes the draft into a record ready for insert.
    /// The supplier name comes from the referenced supplier record so the
    /// product carries it denormalized.
    pub fn finalise(&self, id: String, supplier_name: String) -> Result<Product, ValidationError> {
        let name = match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(ValidationError::new("name", "product name is required")),
        };
        let description = self
            .description
            .clone()
            .ok_or_else(|| ValidationError::new("description", "description is required"))?;
        let category = self
            .category
            .clone()
            .ok_or_else(|| ValidationError::new("category", "category is required"))?;
        if self.price_cents == 0 {
            return Err(ValidationError::new(
                "price",
                "price must be greater than zero",
            ));
        }
        let supplier_id = self
            .supplier_id
            .clone()
            .ok_or_else(|| ValidationError::new("supplier", "supplier reference is required"))?;

        Ok(Product {
            id,
            name,
            description,
            category,
            price_cents: self.price_cents,
            stock_quantity: self.stock_quantity,
            supplier_id,
            supplier_name,
        })
    }
}
