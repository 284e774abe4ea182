mod byte_order_tests;
mod reader_tests;
mod writer_tests;
