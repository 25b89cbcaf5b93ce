// Server-rendered pages (Askama templates)

pub mod handlers;
