use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! opaque_record {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Value);

        impl $name {
            fn text_field(&self, key: &str) -> Option<&str> {
                self.0.get(key).and_then(Value::as_str)
            }
        }
    };
}

opaque_record!(OperatorRecord);
opaque_record!(ExpenseRecord);

// Operator and expense rows are passed through untouched; the accessors only
// read the fields the backend usually sends.
impl OperatorRecord {
    pub fn cnpj(&self) -> Option<&str> {
        self.text_field("cnpj")
    }

    pub fn razao_social(&self) -> Option<&str> {
        self.text_field("razao_social")
    }

    pub fn registro_ans(&self) -> Option<&str> {
        self.text_field("registro_ans")
    }

    pub fn uf(&self) -> Option<&str> {
        self.text_field("uf")
    }

    pub fn modalidade(&self) -> Option<&str> {
        self.text_field("modalidade")
    }
}

impl ExpenseRecord {
    pub fn data_referencia(&self) -> Option<&str> {
        self.text_field("data_referencia")
    }

    pub fn valor(&self) -> Option<f64> {
        self.0
            .get("valor")
            .or_else(|| self.0.get("ValorDespesas"))
            .and_then(Value::as_f64)
    }
}

/// Aggregate statistics snapshot. Kept opaque, replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics(pub Value);

impl Statistics {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
