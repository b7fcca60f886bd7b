//! # QAToto API サーバー
//!
//! ## 起動の流れ
//!
//! 1. `.env` の読み込み、トレーシング初期化
//! 2. 設定の読み込み（不正ならここで終了）
//! 3. 接続プールの作成とプール監視タスクの起動
//! 4. ルーター構築、ポートのバインド
//!
//! ## 終了の流れ
//!
//! SIGINT / SIGTERM を受けると新規接続の受け付けを止め、処理中のリクエストを
//! 待ってから接続プールを閉じる。シグナル受信から 10 秒で終わらなければ
//! 終了コード 1 で強制終了する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p qatoto-api
//!
//! # 本番環境
//! NODE_ENV=production PORT=8000 DATABASE_URL=postgres://... cargo run -p qatoto-api --release
//! ```

use std::{io, sync::Arc, time::Duration};

use anyhow::Context as _;
use axum::http::HeaderValue;
use qatoto_api::{
    app_builder::build_app,
    config::AppConfig,
    state::AppState,
    usecase::UserUseCaseImpl,
};
use qatoto_infra::{
    db::{self, Database, WatchdogSettings},
    repository::{PostgresUserRepository, UserRepository},
};
use qatoto_shared::observability::{TracingConfig, init_tracing};
use tokio::{net::TcpListener, signal};

/// シグナル受信から強制終了までの猶予
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("qatoto-api"));

    let config = AppConfig::from_env()?;

    // データベース接続プールを作成
    let pool = db::create_pool(config.database_url.as_str(), &config.pool)
        .await
        .context("データベース接続に失敗しました")?;
    let database = Database::new(pool, config.environment.is_development());
    tracing::info!("データベースに接続しました");

    spawn_pool_watchdog(database.clone());

    let user_repository: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(database.clone()));
    let state = AppState::new(
        Arc::new(UserUseCaseImpl::new(user_repository)),
        config.environment,
        HeaderValue::from_str(&config.frontend_origin())
            .context("FRONTEND_URL のオリジンをヘッダー値にできません")?,
    );
    let app = build_app(state);

    let listener = match TcpListener::bind((config.host.as_str(), config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            let message = describe_bind_error(config.port, &e);
            tracing::error!("{}", message);
            return Err(e).context(message);
        }
    };
    let port = listener.local_addr().map_or(config.port, |addr| addr.port());
    tracing::info!("Server running on port {} [{}]", port, config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            wait_for_signal(),
            SHUTDOWN_GRACE_PERIOD,
            || std::process::exit(1),
        ))
        .await
        .context("サーバーが異常終了しました")?;
    tracing::info!("HTTP server closed.");

    database.close().await;
    tracing::info!("Database pool closed.");

    Ok(())
}

/// バインド失敗の理由を利用者向けの文言にする
fn describe_bind_error(port: u16, error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::PermissionDenied => format!("Port {port} requires elevated privileges"),
        io::ErrorKind::AddrInUse => format!("Port {port} is already in use"),
        _ => format!("Port {port} could not be bound: {error}"),
    }
}

/// 接続プールの監視タスクを起動する
///
/// プールが連続して応答しなくなったら、劣化した状態で動き続けずにプロセスを終了する。
fn spawn_pool_watchdog(database: Database) {
    tokio::spawn(async move {
        let fault = db::watch_pool(&database, &WatchdogSettings::default()).await;
        tracing::error!(
            error.category = "infrastructure",
            error.kind = "database",
            "{}",
            fault
        );
        std::process::exit(1);
    });
}

/// SIGINT / SIGTERM を待ち、受信したシグナル名を返す
async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C ハンドラを登録できませんでした");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM ハンドラを登録できませんでした");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}

/// シャットダウンの合図を待つ
///
/// `signal` が完了した時点で強制終了タイマーを起動してから戻る。
/// `grace_period` 内にプロセスが終わらなければ `force_exit` を呼ぶ。
async fn shutdown_signal<S, F>(signal: S, grace_period: Duration, force_exit: F)
where
    S: Future<Output = &'static str>,
    F: FnOnce() + Send + 'static,
{
    let signal_name = signal.await;
    tracing::info!("{} received. Shutting down gracefully...", signal_name);

    tokio::spawn(async move {
        tokio::time::sleep(grace_period).await;
        tracing::error!("Forced shutdown after timeout.");
        force_exit();
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(io::ErrorKind::PermissionDenied, "Port 80 requires elevated privileges")]
    #[case(io::ErrorKind::AddrInUse, "Port 80 is already in use")]
    fn test_バインド失敗の文言(#[case] kind: io::ErrorKind, #[case] expected: &str) {
        let error = io::Error::from(kind);

        assert_eq!(describe_bind_error(80, &error), expected);
    }

    #[tokio::test]
    async fn test_シグナル受信から猶予時間が過ぎると強制終了する() {
        let (tx, rx) = tokio::sync::oneshot::channel();

        shutdown_signal(async { "SIGTERM" }, Duration::from_millis(20), move || {
            let _ = tx.send(());
        })
        .await;

        tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("猶予時間の経過後に強制終了が呼ばれること")
            .unwrap();
    }

    #[tokio::test]
    async fn test_猶予時間内は強制終了しない() {
        let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        shutdown_signal(async { "SIGINT" }, Duration::from_secs(10), move || {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!fired.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_その他のバインド失敗は原因を含む() {
        let error = io::Error::other("boom");

        assert!(describe_bind_error(80, &error).contains("boom"));
    }
}
