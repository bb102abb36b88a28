pub mod file_content_client;
