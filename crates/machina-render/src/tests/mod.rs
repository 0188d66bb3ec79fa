mod memo;
mod selfloop;
