//! Интерфейсы сетевого сервера: привязка обработчиков к адресам, кодек
//! кадров, соединение и обработчик событий. Конкретный транспорт здесь не
//! реализуется.

pub mod codec;
pub mod connection;
pub mod handler;
pub mod options;
pub mod server;

pub use codec::{Codec, PassthroughCodec};
pub use connection::Connection;
pub use handler::Handler;
pub use options::{with_codec, with_logger, with_task, ServerOption, ServerOptions, Task};
pub use server::{Action, Address, Server};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;

    use super::*;
    use crate::{
        buffer::{Buffer, RingBuffer},
        error::NetworkError,
        logging::Logger,
    };

    /// Соединение, которое складывает отправленные данные в вектор.
    struct MemoryConnection {
        remote: String,
        codec: Option<Arc<dyn Codec>>,
        sent: Mutex<Vec<Bytes>>,
        logger: Logger,
    }

    #[async_trait]
    impl Connection for MemoryConnection {
        async fn send(
            &self,
            data: &[u8],
            without_encode: bool,
        ) -> Result<(), NetworkError> {
            let out = match (&self.codec, without_encode) {
                (Some(codec), false) => codec.encode(data),
                _ => Bytes::copy_from_slice(data),
            };
            self.sent.lock().push(out);
            Ok(())
        }

        fn remote(&self) -> String {
            self.remote.clone()
        }

        fn local(&self) -> String {
            "127.0.0.1:7000".to_string()
        }

        fn logger(&self) -> &Logger {
            &self.logger
        }
    }

    /// Сервер, у которого каждый адрес обслуживает одного клиента с
    /// заранее заданными входящими данными.
    struct ScriptedServer {
        options: ServerOptions,
        input: Vec<u8>,
        bound: Mutex<Vec<(Address, Arc<dyn Handler>)>>,
        connections: Mutex<Vec<Arc<MemoryConnection>>>,
    }

    #[async_trait]
    impl Server for ScriptedServer {
        fn bind(
            &self,
            address: Address,
            handler: Arc<dyn Handler>,
        ) -> Result<(), NetworkError> {
            self.bound.lock().push((address, handler));
            Ok(())
        }

        fn stop(
            &self,
            addresses: &[Address],
        ) -> Result<(), NetworkError> {
            let mut bound = self.bound.lock();
            if addresses.is_empty() {
                bound.clear();
            } else {
                bound.retain(|(a, _)| !addresses.contains(a));
            }
            Ok(())
        }

        async fn start(&self) -> Result<(), NetworkError> {
            let bound = self.bound.lock().clone();
            for (address, handler) in bound {
                let conn = Arc::new(MemoryConnection {
                    remote: format!("client-of-{address}"),
                    codec: self.options.codec.clone(),
                    sent: Mutex::new(Vec::new()),
                    logger: self.options.logger.clone().unwrap_or_default(),
                });
                self.connections.lock().push(conn.clone());

                let mut action = handler.on_connected(conn.as_ref()).await?;
                if action == Action::Nothing {
                    let mut buf = RingBuffer::new(64);
                    if let Err(e) = buf.write(&self.input) {
                        action = handler.on_error(conn.as_ref(), &NetworkError::from(e)).await;
                    }
                    let frame = match &self.options.codec {
                        Some(codec) => codec.decode(&mut buf),
                        None => Some(buf.bytes()),
                    };
                    if let Some(frame) = frame {
                        action = handler.on_received(frame, conn.as_ref()).await?;
                    }
                }
                handler.on_disconnected(conn.as_ref()).await?;
                if action == Action::StopServer {
                    self.stop(&[])?;
                    break;
                }
            }
            Err(NetworkError::ServerClosed)
        }
    }

    struct EchoHandler {
        events: Mutex<Vec<String>>,
        stop_on: &'static [u8],
    }

    #[async_trait]
    impl Handler for EchoHandler {
        async fn on_connected(
            &self,
            conn: &dyn Connection,
        ) -> Result<Action, NetworkError> {
            self.events.lock().push(format!("connected {}", conn.remote()));
            Ok(Action::Nothing)
        }

        async fn on_disconnected(
            &self,
            _conn: &dyn Connection,
        ) -> Result<(), NetworkError> {
            self.events.lock().push("disconnected".into());
            Ok(())
        }

        async fn on_received(
            &self,
            frame: Bytes,
            conn: &dyn Connection,
        ) -> Result<Action, NetworkError> {
            conn.logger().debug("frame received");
            conn.send(&frame, false).await?;
            if &frame[..] == self.stop_on {
                return Ok(Action::StopServer);
            }
            Ok(Action::Disconnect)
        }

        async fn on_error(
            &self,
            _conn: &dyn Connection,
            err: &NetworkError,
        ) -> Action {
            self.events.lock().push(format!("error {err}"));
            Action::Disconnect
        }
    }

    fn server(input: &[u8]) -> ScriptedServer {
        ScriptedServer {
            options: ServerOptions::from_opts([
                with_codec(PassthroughCodec),
                with_logger(Logger::default()),
            ]),
            input: input.to_vec(),
            bound: Mutex::new(Vec::new()),
            connections: Mutex::new(Vec::new()),
        }
    }

    fn address(port: u16) -> Address {
        Address::from(std::net::SocketAddr::from(([127, 0, 0, 1], port)))
    }

    /// Тест проверяет полный цикл: подключение, кадр через кодек, ответ,
    /// отключение и `ServerClosed`, когда все адреса остановлены.
    #[tokio::test]
    async fn test_handler_lifecycle_and_server_closed() {
        let srv = server(b"ping");
        let handler = Arc::new(EchoHandler {
            events: Mutex::new(Vec::new()),
            stop_on: b"quit",
        });
        srv.bind(address(7001), handler.clone()).unwrap();

        let res = srv.start().await;
        assert!(matches!(res, Err(NetworkError::ServerClosed)));

        let events = handler.events.lock().clone();
        assert_eq!(
            events,
            vec!["connected client-of-127.0.0.1:7001", "disconnected"]
        );
        let conns = srv.connections.lock();
        assert_eq!(conns[0].sent.lock().as_slice(), &[Bytes::from_static(b"ping")]);
    }

    /// Тест проверяет, что `StopServer` останавливает все адреса.
    #[tokio::test]
    async fn test_stop_server_action() {
        let srv = server(b"quit");
        let handler = Arc::new(EchoHandler {
            events: Mutex::new(Vec::new()),
            stop_on: b"quit",
        });
        srv.bind(address(7001), handler.clone()).unwrap();
        srv.bind(address(7002), handler.clone()).unwrap();

        assert!(matches!(srv.start().await, Err(NetworkError::ServerClosed)));
        assert!(srv.bound.lock().is_empty());
        // второй адрес так и не обслужил клиента
        assert_eq!(srv.connections.lock().len(), 1);
    }

    #[test]
    fn test_stop_selected_addresses() {
        let srv = server(b"");
        let handler = Arc::new(EchoHandler {
            events: Mutex::new(Vec::new()),
            stop_on: b"",
        });
        srv.bind(address(1), handler.clone()).unwrap();
        srv.bind(address(2), handler).unwrap();
        srv.stop(&[address(1)]).unwrap();

        let bound = srv.bound.lock();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].0, address(2));
    }

    /// Тест проверяет, что переполнение буфера уходит в `on_error`.
    #[tokio::test]
    async fn test_buffer_overflow_reported_to_handler() {
        let srv = server(&[7u8; 100]);
        let handler = Arc::new(EchoHandler {
            events: Mutex::new(Vec::new()),
            stop_on: b"",
        });
        srv.bind(address(7003), handler.clone()).unwrap();
        let _ = srv.start().await;

        let events = handler.events.lock().clone();
        assert!(events.iter().any(|e| e.starts_with("error Buffer error")));
    }
}
