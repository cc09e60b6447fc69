pub mod huobi;
