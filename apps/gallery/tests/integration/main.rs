mod helpers;
mod test_contract;
mod test_engine;
