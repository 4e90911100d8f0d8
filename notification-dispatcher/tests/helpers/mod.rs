pub mod channel_mock;
