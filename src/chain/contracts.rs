//! Solidity interfaces used by the staking core

use alloy_sol_types::sol;

sol! {
    /// Liquidity-mining (staking rewards) contract
    #[derive(Debug)]
    interface ILiquidityMining {
        function stake(uint256 amount) external;
        function stakeWithPermit(uint256 amount, bytes calldata permitData) external;
        function withdraw(uint256 amount) external;
        function getReward() external;

        function balanceOf(address account) external view returns (uint256);
        function earned(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function rewardRate() external view returns (uint256);
    }

    /// ERC-20 pool token with EIP-2612 permit
    #[derive(Debug)]
    interface IPermitToken {
        function name() external view returns (string);
        function nonces(address owner) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        function increaseAllowance(address spender, uint256 addedValue) external returns (bool);
        function permit(
            address owner, address spender, uint256 value, uint256 deadline,
            uint8 v, bytes32 r, bytes32 s
        ) external;
    }

    /// Bridged token with the holder/allowed permit flavour
    #[derive(Debug)]
    interface IBridgePermitToken {
        function permit(
            address holder, address spender, uint256 nonce, uint256 expiry, bool allowed,
            uint8 v, bytes32 r, bytes32 s
        ) external;
    }

    /// Constant-product pair backing LP stakes
    #[derive(Debug)]
    interface IUniswapV2Pair {
        function getReserves()
            external
            view
            returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function totalSupply() external view returns (uint256);
    }
}
