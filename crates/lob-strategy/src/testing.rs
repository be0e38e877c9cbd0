//! Test doubles shared by the unit tests.

use lob_connector::{Connector, ConnectorResult};
use lob_core::{OrderId, OrderRequest, Price, PriceType};
use mockall::mock;
use rust_decimal::Decimal;

mock! {
    pub Venue {}

    impl Connector for Venue {
        fn name(&self) -> &str;
        fn is_ready(&self) -> bool;
        fn trading_pair_separator(&self) -> char;
        fn get_balance(&self, asset: &str) -> ConnectorResult<Decimal>;
        fn get_available_balance(&self, asset: &str) -> ConnectorResult<Decimal>;
        fn get_price(&self, trading_pair: &str, price_type: PriceType) -> ConnectorResult<Price>;
        fn submit_order(&self, request: &OrderRequest) -> ConnectorResult<OrderId>;
        fn cancel_order(&self, trading_pair: &str, order_id: &OrderId) -> ConnectorResult<()>;
    }
}
