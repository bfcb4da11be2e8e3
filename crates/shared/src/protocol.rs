use serde::{Deserialize, Serialize};

use crate::domain::OperatorRecord;

/// Query string for `GET /operadoras`. `search` is always sent, empty means unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorsQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

/// Body of `GET /operadoras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPage {
    pub data: Vec<OperatorRecord>,
    pub total: u64,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_page_accepts_body_without_limit() {
        let page: OperatorPage = serde_json::from_value(json!({
            "data": [{"cnpj": "123"}],
            "total": 1,
            "page": 1
        }))
        .expect("decode");

        assert_eq!(page.total, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, None);
        assert_eq!(page.data[0].cnpj(), Some("123"));
    }

    #[test]
    fn operators_query_serializes_empty_search() {
        let query = OperatorsQuery {
            page: 2,
            limit: 10,
            search: String::new(),
        };
        let value = serde_json::to_value(&query).expect("encode");
        assert_eq!(value, json!({"page": 2, "limit": 10, "search": ""}));
    }
}
