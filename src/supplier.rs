use crate::error::ValidationError;

/// A supplier on record. Created once, read-only thereafter.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub email: String,
    #[n(3)]
    pub phone: String,
    #[n(4)]
    pub address: String,
}

// used for constructing drafts before the store is touched
#[derive(Default, Debug)]
pub struct SupplierDraft {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl SupplierDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
    pub fn set_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
    pub fn set_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }
    pub fn set_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// Checks fields, then shapes the draft into a record ready for insert.
    pub fn finalise(&self, id: String) -> Result<Supplier, ValidationError> {
        let name = match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(ValidationError::new("name", "supplier name is required")),
        };
        let email = match self.email.as_deref() {
            Some(email) if email.contains('@') => email.to_string(),
            Some(_) => return Err(ValidationError::new("email", "email must contain '@'")),
            None => return Err(ValidationError::new("email", "email is required")),
        };
        let phone = match self.phone.as_deref() {
            Some(phone) if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) => {
                phone.to_string()
            }
            _ => {
                return Err(ValidationError::new(
                    "phone",
                    "phone must be exactly 10 digits",
                ));
            }
        };
        let address = match self.address.as_deref() {
            Some(address) if !address.trim().is_empty() => address.to_string(),
            _ => return Err(ValidationError::new("address", "address is required")),
        };

        Ok(Supplier {
            id,
            name,
            email,
            phone,
            address,
        })
    }
}
