use clobbr::error::AppResult;

fn main() -> AppResult<()> {
    clobbr::entry::run()
}
