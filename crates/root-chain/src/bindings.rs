//! ABI of the `RootChain` contract, restricted to what the system uses.

#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    interface RootChain {
        event Deposit(
            uint64 indexed slot,
            uint256 blockNumber,
            uint256 denomination,
            address indexed from,
            address indexed contractAddress
        );
        event SubmittedBlock(uint256 blockNumber, bytes32 root, uint256 timestamp);
        event StartedExit(uint64 indexed slot, address indexed owner);
        event ChallengedExit(uint64 indexed slot, bytes32 txHash, uint256 challengingBlockNumber);
        event RespondedExitChallenge(uint64 indexed slot);
        event FinalizedExit(uint64 indexed slot, address owner);

        function currentBlock() external view returns (uint256 blockNumber);
        function childBlockInterval() external view returns (uint256 interval);
        function getPlasmaCoin(uint64 slot)
            external
            view
            returns (
                uint256 uid,
                uint256 depositBlock,
                uint256 denomination,
                address owner,
                uint8 state,
                uint8 mode,
                address contractAddress
            );
        function getBlockRoot(uint256 blockNumber) external view returns (bytes32 root);
        function getExit(uint64 slot)
            external
            view
            returns (address owner, uint256 prevBlock, uint256 exitBlock, uint8 state);

        function submitBlock(bytes32 root) external;

        function startExit(
            uint64 slot,
            bytes prevTxBytes,
            bytes exitingTxBytes,
            bytes prevTxInclusionProof,
            bytes exitingTxInclusionProof,
            bytes signature,
            uint256[2] blocks
        ) external payable;

        function challengeBefore(
            uint64 slot,
            bytes prevTxBytes,
            bytes txBytes,
            bytes prevTxInclusionProof,
            bytes txInclusionProof,
            bytes signature,
            uint256[2] blocks
        ) external payable;

        function respondChallengeBefore(
            uint64 slot,
            bytes32 challengingTxHash,
            uint256 respondingBlockNumber,
            bytes respondingTransaction,
            bytes proof,
            bytes signature
        ) external;

        function challengeBetween(
            uint64 slot,
            uint256 challengingBlockNumber,
            bytes challengingTransaction,
            bytes proof,
            bytes signature
        ) external;

        function challengeAfter(
            uint64 slot,
            uint256 challengingBlockNumber,
            bytes challengingTransaction,
            bytes proof,
            bytes signature
        ) external;

        function cancelExit(uint64 slot) external;
        function cancelExits(uint64[] slots) external;
        function finalizeExits() external;
        function finalizeExit(uint64 slot) external;
        function withdraw(uint64 slot) external;
        function withdrawBonds() external;
    }
}
