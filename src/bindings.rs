use alloy::sol;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface DistributionExecutable {
        function sendToMany(uint256 amount, address treasury) external payable;
        function claim(uint256 amount) external payable;
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IAxelarGateway {
        function tokenAddresses(string memory symbol) external view returns (address);
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }
);
