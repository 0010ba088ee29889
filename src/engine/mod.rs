export![framebuffer, shader, texture, uniform_buffer, vertex_array];
