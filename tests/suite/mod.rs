mod launcher;
mod lifecycle;
mod osd;
mod terminal;
