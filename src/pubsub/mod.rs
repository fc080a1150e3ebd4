//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Внутрипроцессный брокер: издатели ставят значения в очередь (с темой или
//! без), подписчики регистрируют свой канал (с фильтром по теме и таймаутом
//! доставки или без), брокер рассылает каждое значение всем подходящим
//! подписчикам.
//!
//! - `broker`: трейт [`Broker`] с операциями фасада.
//! - `memory`: [`MemoryBroker`] на каналах `tokio` и [`BrokerConfig`].
//! - `dispatch` (приватный): цикл диспетчеризации, единственный владелец
//!   реестра подписчиков.
//! - `message`: запросы, которые фасад передаёт циклу.
//! - `options`: опции публикации и подписки.
//! - `subscriber`: запись реестра и сам реестр (реестр виден только
//!   внутри крейта).
//!
//! Доставка best-effort: сообщение для медленного подписчика может быть
//! потеряно, издатель об этом не узнаёт.

pub mod broker;
mod dispatch;
pub mod memory;
pub mod message;
pub mod options;
pub mod subscriber;

pub use broker::*;
pub use dispatch::CloseReason;
pub use memory::*;
pub use message::PublishItem;
pub use options::*;
pub use subscriber::*;
