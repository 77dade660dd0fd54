mod integration;
mod reverse_dns;
