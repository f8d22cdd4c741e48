//! Waiting for submitted transactions to be mined.

use std::time::Duration;

use alloy::{network::ReceiptResponse, providers::Provider};
use alloy_primitives::B256;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{RootChainError, RootChainResult};

/// Polls for the receipt of `tx_hash` every `poll_interval` until it is mined, `timeout` elapses
/// or `cancel` fires.
///
/// A reverted receipt is an error. Exceeding the deadline is reported as
/// [`RootChainError::ConfirmationTimeout`]; the transaction is never resubmitted from here.
pub async fn wait_for_receipt<P>(
    provider: &P,
    tx_hash: B256,
    poll_interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
) -> RootChainResult<()>
where
    P: Provider + ?Sized,
{
    let deadline = Instant::now() + timeout;
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                warn!(%tx_hash, "abandoning confirmation wait on shutdown");
                return Err(RootChainError::Cancelled(tx_hash));
            }
            _ = tokio::time::sleep_until(deadline) => {
                return Err(RootChainError::ConfirmationTimeout { tx_hash, timeout });
            }
            _ = ticker.tick() => {}
        }

        match provider.get_transaction_receipt(tx_hash).await? {
            Some(receipt) if ReceiptResponse::status(&receipt) => {
                debug!(%tx_hash, block = ?receipt.block_number(), "transaction confirmed");
                return Ok(());
            }
            Some(_) => return Err(RootChainError::Reverted(tx_hash)),
            None => debug!(%tx_hash, "transaction not mined yet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::providers::ProviderBuilder;
    use alloy_transport::mock::Asserter;
    use serde_json::{json, Value};

    use super::*;

    const POLL: Duration = Duration::from_secs(10);

    fn receipt(tx_hash: B256, succeeded: bool) -> Value {
        let status = if succeeded { "0x1" } else { "0x0" };
        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0xbb),
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "from": "0x0000000000000000000000000000000000000001",
            "to": "0x0000000000000000000000000000000000000002",
            "contractAddress": null,
        })
    }

    fn not_mined(asserter: &Asserter) {
        asserter.push_success(&Option::<()>::None);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_until_the_receipt_appears() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let tx_hash = B256::repeat_byte(1);
        not_mined(&asserter);
        not_mined(&asserter);
        asserter.push_success(&receipt(tx_hash, true));

        let result = wait_for_receipt(
            &provider,
            tx_hash,
            POLL,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await;

        assert!(result.is_ok(), "{result:?}");
        assert!(asserter.read_q().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_receipts_are_errors() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let tx_hash = B256::repeat_byte(2);
        asserter.push_success(&receipt(tx_hash, false));

        let result = wait_for_receipt(
            &provider,
            tx_hash,
            POLL,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(RootChainError::Reverted(hash)) if hash == tx_hash));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_at_the_deadline_without_extra_polls() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let tx_hash = B256::repeat_byte(3);
        // Polls at 0s, 10s and 20s; the deadline at 25s comes before the next one.
        for _ in 0..3 {
            not_mined(&asserter);
        }

        let timeout = Duration::from_secs(25);
        let started = Instant::now();
        let result =
            wait_for_receipt(&provider, tx_hash, POLL, timeout, &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(RootChainError::ConfirmationTimeout { tx_hash: hash, timeout: waited })
                if hash == tx_hash && waited == timeout
        ));
        assert!(started.elapsed() >= timeout);
        assert!(asserter.read_q().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_a_due_poll() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let tx_hash = B256::repeat_byte(4);
        asserter.push_success(&receipt(tx_hash, true));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result =
            wait_for_receipt(&provider, tx_hash, POLL, Duration::from_secs(60), &cancel).await;

        assert!(matches!(result, Err(RootChainError::Cancelled(hash)) if hash == tx_hash));
        assert_eq!(asserter.read_q().len(), 1);
    }
}
