//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use boomcats_transport::{Connection, Inbound, Transport, WebSocketTransport};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on port 0, accepts one client, and returns both ends.
    async fn accepted_pair() -> (boomcats_transport::WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        (server_conn, client_ws)
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive_text() {
        let (server_conn, mut client_ws) = accepted_pair().await;
        assert!(server_conn.id().into_inner() > 0);

        server_conn
            .send("version 3")
            .await
            .expect("send should succeed");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "version 3");

        client_ws
            .send(Message::Text("join_lobby alpha alice".into()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, Inbound::Text("join_lobby alpha alice".into()));

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_binary_utf8_frame_is_read_as_text() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws
            .send(Message::Binary(b"draw".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, Inbound::Text("draw".into()));
    }

    #[tokio::test]
    async fn test_websocket_non_utf8_frame_is_skipped() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws
            .send(Message::Binary(vec![0xff, 0xfe, 0xfd].into()))
            .await
            .unwrap();
        client_ws.send(Message::Text("sort".into())).await.unwrap();

        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, Inbound::Text("sort".into()));
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        let (server_conn, mut client_ws) = accepted_pair().await;
        let server_conn = std::sync::Arc::new(server_conn);

        // A reader parked in recv() must not block the writer.
        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        server_conn.send("now_playing alice").await.unwrap();
        server_conn.ping().await.unwrap();
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "now_playing alice");

        client_ws.send(Message::Text("draw".into())).await.unwrap();
        let got = reader.await.unwrap().unwrap();
        assert_eq!(got, Some(Inbound::Text("draw".into())));
    }

    #[tokio::test]
    async fn test_websocket_ping_from_client_surfaces_as_keepalive() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws.send(Message::Ping(Vec::new().into())).await.unwrap();
        client_ws.send(Message::Text("sort".into())).await.unwrap();

        assert_eq!(server_conn.recv().await.unwrap(), Some(Inbound::Keepalive));
        assert_eq!(
            server_conn.recv().await.unwrap(),
            Some(Inbound::Text("sort".into()))
        );
    }

    #[tokio::test]
    async fn test_websocket_pong_reply_surfaces_as_keepalive() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        server_conn.ping().await.unwrap();
        // Reading on the client processes the ping and queues the pong;
        // the text send flushes it alongside the text frame.
        let client = tokio::spawn(async move {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(100),
                client_ws.next(),
            )
            .await;
            client_ws.send(Message::Text("sort".into())).await.unwrap();
            client_ws
        });

        let first = server_conn.recv().await.unwrap().unwrap();
        let second = server_conn.recv().await.unwrap().unwrap();
        let mut got = [first, second];
        got.sort_by_key(|inbound| matches!(inbound, Inbound::Text(_)));
        assert_eq!(got, [Inbound::Keepalive, Inbound::Text("sort".into())]);
        drop(client.await.unwrap());
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }
}
