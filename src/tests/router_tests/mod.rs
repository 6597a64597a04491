mod feed_tests;
mod flash_tests;
mod offer_tests;
